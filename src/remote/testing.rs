//! In-memory store for component and app tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};

use crate::auth::{Credential, Session, User};
use crate::catalog::{Game, GameId, GamePatch};

use super::{RemoteError, RemoteResult, RemoteStore};

#[derive(Default)]
pub struct FakeStore {
    games: Mutex<Vec<Game>>,
    delete_error: Mutex<Option<String>>,
    update_error: Mutex<Option<String>>,
    sign_in_error: Mutex<Option<RemoteError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_games(games: Vec<Game>) -> Self {
        Self {
            games: Mutex::new(games),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_delete(&self, message: &str) {
        *self.delete_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_update(&self, message: &str) {
        *self.update_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_sign_in(&self, error: RemoteError) {
        *self.sign_in_error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn rejected(message: &str) -> RemoteError {
    RemoteError::Api { status: 400, message: message.to_string() }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn list_games(&self) -> RemoteResult<Vec<Game>> {
        self.enter("list".to_string()).await;
        Ok(self.games.lock().unwrap().clone())
    }

    async fn delete_game(&self, id: &GameId) -> RemoteResult<()> {
        self.enter(format!("delete {}", id)).await;
        if let Some(message) = self.delete_error.lock().unwrap().as_deref() {
            return Err(rejected(message));
        }
        self.games.lock().unwrap().retain(|g| &g.id != id);
        Ok(())
    }

    async fn update_game(&self, id: &GameId, patch: &GamePatch) -> RemoteResult<Vec<Game>> {
        self.enter(format!("update {} {} {}", id, patch.name, patch.image_url)).await;
        if let Some(message) = self.update_error.lock().unwrap().as_deref() {
            return Err(rejected(message));
        }
        let mut games = self.games.lock().unwrap();
        let updated = games
            .iter_mut()
            .filter(|g| &g.id == id)
            .map(|g| {
                g.name = patch.name.clone();
                g.image_url = patch.image_url.clone();
                g.clone()
            })
            .collect();
        Ok(updated)
    }

    async fn sign_in_with_password(&self, credential: Credential) -> RemoteResult<Session> {
        self.enter(format!("sign_in {}", credential.email)).await;
        if let Some(error) = self.sign_in_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(Session {
            access_token: SecretString::from(format!("token-for-{}", credential.password().expose_secret().len())),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            user: User { id: "user-1".to_string(), email: Some(credential.email.clone()) },
        })
    }
}
