//! Row Editor
//!
//! One listed game record with its edit modal and delete confirmation.
//! The editor owns its transient state; remote calls are handed back to
//! the caller as jobs and their outcomes fed in through `finish_*`.

use tracing::{debug, error, info, warn};

use crate::remote::RemoteResult;
use crate::tasks::Job;

use super::{EditGameForm, Game, Refetch};

pub const EDIT_SUCCESS: &str = "Game edited successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Delete,
    Update,
}

pub struct RowEditor {
    game: Game,
    form: Option<EditGameForm>,
    confirming_delete: bool,
    pending: Option<Pending>,
    error_message: Option<String>,
    success_message: Option<String>,
    surface_delete_errors: bool,
    refetch: Refetch,
}

impl RowEditor {
    pub fn new(game: Game, refetch: Refetch) -> Self {
        Self {
            game,
            form: None,
            confirming_delete: false,
            pending: None,
            error_message: None,
            success_message: None,
            surface_delete_errors: false,
            refetch,
        }
    }

    /// Also show failed deletes as a visible error instead of only logging them.
    pub fn surface_delete_errors(mut self, surface: bool) -> Self {
        self.surface_delete_errors = surface;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Replaces the displayed record with a freshly fetched one.
    pub fn set_game(&mut self, game: Game) {
        self.game = game;
    }

    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    pub fn form(&self) -> Option<&EditGameForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditGameForm> {
        self.form.as_mut()
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn open_edit(&mut self) {
        if self.form.is_none() {
            self.form = Some(EditGameForm::from_game(&self.game));
        }
    }

    pub fn close_edit(&mut self) {
        self.form = None;
    }

    pub fn submit_edit(&mut self) -> Option<Job> {
        if self.is_busy() {
            debug!(id = %self.game.id, "edit refused, request in flight");
            return None;
        }
        let form = self.form.as_mut()?;
        if !form.validate() {
            return None;
        }

        self.pending = Some(Pending::Update);
        self.error_message = None;
        self.success_message = None;
        Some(Job::UpdateGame {
            id: self.game.id.clone(),
            patch: form.patch(),
        })
    }

    pub fn finish_update(&mut self, result: RemoteResult<Vec<Game>>) {
        self.pending = None;
        match result {
            Ok(rows) => {
                info!(id = %self.game.id, rows = rows.len(), "game updated");
                self.success_message = Some(EDIT_SUCCESS.to_string());
                (self.refetch)();
            }
            Err(e) => {
                warn!(id = %self.game.id, error = %e, "game update failed");
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub fn request_delete(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.confirming_delete = true;
        true
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub fn confirm_delete(&mut self) -> Option<Job> {
        if !std::mem::take(&mut self.confirming_delete) || self.is_busy() {
            return None;
        }
        self.pending = Some(Pending::Delete);
        Some(Job::DeleteGame(self.game.id.clone()))
    }

    pub fn finish_delete(&mut self, result: RemoteResult<()>) {
        self.pending = None;
        match result {
            Ok(()) => {
                info!(id = %self.game.id, "game deleted");
                (self.refetch)();
            }
            Err(e) => {
                error!(id = %self.game.id, error = %e, "error deleting game");
                if self.surface_delete_errors {
                    self.error_message = Some(e.to_string());
                }
            }
        }
    }

    /// Drops the in-flight mark when a job could not be dispatched.
    pub fn abandon_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::catalog::form::{IMAGE_URL, NAME};
    use crate::catalog::{GameId, GamePatch};
    use crate::remote::RemoteError;

    fn editor(game: Game) -> (RowEditor, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let refetch: Refetch = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (RowEditor::new(game, refetch), count)
    }

    fn rejected(message: &str) -> RemoteError {
        RemoteError::Api { status: 500, message: message.to_string() }
    }

    fn set(editor: &mut RowEditor, field: usize, value: &str) {
        editor.form_mut().unwrap().form_mut().field_mut(field).value = value.to_string();
    }

    #[test]
    fn test_blank_name_blocks_submission() {
        let (mut editor, _) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.open_edit();
        set(&mut editor, NAME, "  ");

        assert!(editor.submit_edit().is_none());
        assert!(!editor.is_busy());
        let form = editor.form().unwrap();
        assert!(form.name_error().is_some());
        assert!(form.image_error().is_none());
    }

    #[test]
    fn test_blank_fields_never_produce_update() {
        for (name, image) in [("", "http://x"), ("Doom", ""), ("\t", "http://x"), ("Doom", " \n "), (" ", " ")] {
            let (mut editor, _) = editor(Game::new("1", "Doom", "http://x"));
            editor.open_edit();
            set(&mut editor, NAME, name);
            set(&mut editor, IMAGE_URL, image);
            assert!(editor.submit_edit().is_none(), "{name:?}/{image:?} should be blocked");
        }
    }

    #[test]
    fn test_valid_edit_produces_update_job() {
        let (mut editor, _) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.open_edit();
        set(&mut editor, NAME, "Doom II");

        match editor.submit_edit() {
            Some(Job::UpdateGame { id, patch }) => {
                assert_eq!(id, GameId::new("42"));
                assert_eq!(patch, GamePatch { name: "Doom II".into(), image_url: "http://x/y.png".into() });
            }
            other => panic!("unexpected job: {:?}", other),
        }
        assert_eq!(editor.pending(), Some(Pending::Update));
        // No optimistic update
        assert_eq!(editor.game().name, "Doom");
    }

    #[test]
    fn test_failed_update_keeps_modal_open() {
        let (mut editor, refetches) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.open_edit();
        editor.submit_edit().unwrap();
        editor.finish_update(Err(rejected("permission denied")));

        assert!(editor.is_editing());
        assert_eq!(editor.error_message(), Some("permission denied"));
        assert_eq!(editor.success_message(), None);
        assert_eq!(refetches.load(Ordering::SeqCst), 0);
        assert!(!editor.is_busy());
    }

    #[test]
    fn test_successful_update_refetches_once() {
        let (mut editor, refetches) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.open_edit();
        editor.submit_edit().unwrap();
        editor.finish_update(Ok(vec![Game::new("42", "Doom", "http://x/y.png")]));

        assert_eq!(editor.success_message(), Some(EDIT_SUCCESS));
        assert_eq!(editor.error_message(), None);
        assert_eq!(refetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resubmit_clears_previous_messages() {
        let (mut editor, _) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.open_edit();
        editor.submit_edit().unwrap();
        editor.finish_update(Ok(Vec::new()));

        editor.submit_edit().unwrap();
        editor.finish_update(Err(rejected("conflict")));
        assert_eq!(editor.success_message(), None);
        assert_eq!(editor.error_message(), Some("conflict"));
    }

    #[test]
    fn test_in_flight_guard() {
        let (mut editor, _) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.open_edit();
        assert!(editor.submit_edit().is_some());
        assert!(editor.submit_edit().is_none());
        assert!(!editor.request_delete());

        editor.finish_update(Ok(Vec::new()));
        assert!(editor.request_delete());
        assert!(editor.confirm_delete().is_some());
        assert!(editor.submit_edit().is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut editor, refetches) = editor(Game::new("7", "Quake", "http://x/q.png"));
        assert!(editor.confirm_delete().is_none());

        editor.request_delete();
        editor.cancel_delete();
        assert!(editor.confirm_delete().is_none());

        editor.request_delete();
        assert!(editor.is_confirming_delete());
        match editor.confirm_delete() {
            Some(Job::DeleteGame(id)) => assert_eq!(id, GameId::new("7")),
            other => panic!("unexpected job: {:?}", other),
        }
        assert!(!editor.is_confirming_delete());

        editor.finish_delete(Ok(()));
        assert_eq!(refetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_delete_is_only_logged() {
        let (mut editor, refetches) = editor(Game::new("7", "Quake", "http://x/q.png"));
        editor.request_delete();
        editor.confirm_delete().unwrap();
        editor.finish_delete(Err(rejected("network down")));

        assert_eq!(refetches.load(Ordering::SeqCst), 0);
        assert_eq!(editor.error_message(), None);
        assert!(!editor.is_busy());
    }

    #[test]
    fn test_failed_delete_surfaced_when_configured() {
        let (editor, refetches) = editor(Game::new("7", "Quake", "http://x/q.png"));
        let mut editor = editor.surface_delete_errors(true);
        editor.request_delete();
        editor.confirm_delete().unwrap();
        editor.finish_delete(Err(rejected("network down")));

        assert_eq!(refetches.load(Ordering::SeqCst), 0);
        assert_eq!(editor.error_message(), Some("network down"));
    }

    #[test]
    fn test_form_prefilled_from_latest_record() {
        let (mut editor, _) = editor(Game::new("42", "Doom", "http://x/y.png"));
        editor.set_game(Game::new("42", "Doom Eternal", "http://x/e.png"));
        editor.open_edit();
        assert_eq!(editor.form().unwrap().form().value(NAME), "Doom Eternal");
    }
}
