//! Task Runner
//!
//! Runs remote calls off the UI loop. Every call races a deadline and a
//! cancellation token, and at most one call per task key is in flight.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{Credential, Session};
use crate::catalog::{Game, GameId, GamePatch};
use crate::remote::{RemoteError, RemoteResult, RemoteStore};

/// A remote call requested by a component
#[derive(Debug)]
pub enum Job {
    ListGames,
    DeleteGame(GameId),
    UpdateGame { id: GameId, patch: GamePatch },
    SignIn(Credential),
}

impl Job {
    pub fn key(&self) -> TaskKey {
        match self {
            Self::ListGames => TaskKey::Listing,
            Self::DeleteGame(id) | Self::UpdateGame { id, .. } => TaskKey::Game(id.clone()),
            Self::SignIn(_) => TaskKey::Login,
        }
    }

    /// Listing reloads replace an outstanding reload instead of being refused.
    fn supersedes(&self) -> bool {
        matches!(self, Self::ListGames)
    }

    fn failure(&self) -> fn(RemoteError) -> TaskResult {
        match self {
            Self::ListGames => |e: RemoteError| TaskResult::Listed(Err(e)),
            Self::DeleteGame(_) => |e: RemoteError| TaskResult::Deleted(Err(e)),
            Self::UpdateGame { .. } => |e: RemoteError| TaskResult::Updated(Err(e)),
            Self::SignIn(_) => |e: RemoteError| TaskResult::SignedIn(Err(e)),
        }
    }
}

/// The entity a remote call belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKey {
    Listing,
    Game(GameId),
    Login,
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => f.write_str("the listing"),
            Self::Game(id) => write!(f, "game {}", id),
            Self::Login => f.write_str("sign-in"),
        }
    }
}

#[derive(Debug)]
pub enum TaskResult {
    Listed(RemoteResult<Vec<Game>>),
    Deleted(RemoteResult<()>),
    Updated(RemoteResult<Vec<Game>>),
    SignedIn(RemoteResult<Session>),
}

#[derive(Debug)]
pub struct TaskOutcome {
    pub key: TaskKey,
    pub id: Uuid,
    pub result: TaskResult,
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("A request for {0} is already in flight")]
    Busy(TaskKey),
}

struct InFlight {
    id: Uuid,
    token: CancellationToken,
}

pub struct TaskRunner {
    store: Arc<dyn RemoteStore>,
    deadline: Duration,
    outcomes: mpsc::UnboundedSender<TaskOutcome>,
    in_flight: HashMap<TaskKey, InFlight>,
    shutdown: CancellationToken,
}

impl TaskRunner {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        deadline: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<TaskOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        let runner = Self {
            store,
            deadline,
            outcomes,
            in_flight: HashMap::new(),
            shutdown: CancellationToken::new(),
        };
        (runner, rx)
    }

    /// Spawns the job on the runtime. Must be called from within a tokio runtime.
    pub fn spawn(&mut self, job: Job) -> Result<Uuid, TaskError> {
        let key = job.key();
        if job.supersedes() {
            self.cancel(&key);
        } else if self.in_flight.contains_key(&key) {
            return Err(TaskError::Busy(key));
        }

        let id = Uuid::new_v4();
        let token = self.shutdown.child_token();
        self.in_flight.insert(key.clone(), InFlight { id, token: token.clone() });

        let store = Arc::clone(&self.store);
        let outcomes = self.outcomes.clone();
        let deadline = self.deadline;
        debug!(%id, %key, "dispatching remote call");

        tokio::spawn(async move {
            let result = run_job(store.as_ref(), job, deadline, token).await;
            let _ = outcomes.send(TaskOutcome { key, id, result });
        });

        Ok(id)
    }

    pub fn is_in_flight(&self, key: &TaskKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Cancels the outstanding call for `key`. Its outcome becomes stale.
    pub fn cancel(&mut self, key: &TaskKey) -> bool {
        match self.in_flight.remove(key) {
            Some(call) => {
                debug!(id = %call.id, %key, "cancelling remote call");
                call.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Marks the call as finished. Returns false for stale outcomes, which
    /// belong to a cancelled or superseded call.
    pub fn settle(&mut self, outcome: &TaskOutcome) -> bool {
        let current = self
            .in_flight
            .get(&outcome.key)
            .is_some_and(|call| call.id == outcome.id);
        if current {
            self.in_flight.remove(&outcome.key);
        }
        current
    }

    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.in_flight.clear();
    }
}

async fn run_job(
    store: &dyn RemoteStore,
    job: Job,
    deadline: Duration,
    token: CancellationToken,
) -> TaskResult {
    let fail = job.failure();
    tokio::select! {
        _ = token.cancelled() => fail(RemoteError::Cancelled),
        result = tokio::time::timeout(deadline, execute(store, job)) => {
            result.unwrap_or_else(|_| fail(RemoteError::Timeout(deadline)))
        }
    }
}

async fn execute(store: &dyn RemoteStore, job: Job) -> TaskResult {
    match job {
        Job::ListGames => TaskResult::Listed(store.list_games().await),
        Job::DeleteGame(id) => TaskResult::Deleted(store.delete_game(&id).await),
        Job::UpdateGame { id, patch } => TaskResult::Updated(store.update_game(&id, &patch).await),
        Job::SignIn(credential) => TaskResult::SignedIn(store.sign_in_with_password(credential).await),
    }
}
