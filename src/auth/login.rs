//! Login Control
//!
//! Login modal: email/password form, a loading flag while the sign-in
//! call is out, and navigation to `/` once it succeeds.

use tracing::{debug, error, info, warn};
use zeroize::Zeroize;

use crate::form::{Form, FormField, Rule};
use crate::remote::{RemoteError, RemoteResult};
use crate::router::{Navigate, Route};
use crate::tasks::Job;

use super::email::is_valid_email;
use super::{Credential, Session};

pub const EMAIL: usize = 0;
pub const PASSWORD: usize = 1;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug)]
pub struct LoginForm {
    form: Form,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let form = Form::new(vec![
            FormField::text("E-mail")
                .rule(Rule::Required("The e-mail field must be filled in"))
                .rule(Rule::Pattern(is_valid_email, "Invalid e-mail")),
            FormField::secret("Password").rule(Rule::Required("Fill in the password field")),
        ]);
        Self { form }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn email_error(&self) -> Option<&'static str> {
        self.form.error(EMAIL)
    }

    pub fn password_error(&self) -> Option<&'static str> {
        self.form.error(PASSWORD)
    }

    fn credential(&self) -> Credential {
        Credential::new(self.form.value(EMAIL), self.form.value(PASSWORD))
    }
}

impl Drop for LoginForm {
    fn drop(&mut self) {
        self.form.field_mut(PASSWORD).value.zeroize();
    }
}

pub struct LoginControl {
    form: LoginForm,
    open: bool,
    loading: bool,
    error_message: Option<String>,
    navigate: Navigate,
}

impl LoginControl {
    pub fn new(navigate: Navigate) -> Self {
        Self {
            form: LoginForm::new(),
            open: false,
            loading: false,
            error_message: None,
            navigate,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closes the modal. Returns true when an attempt was still in flight
    /// and should be cancelled.
    pub fn close(&mut self) -> bool {
        self.open = false;
        std::mem::take(&mut self.loading)
    }

    pub fn submit(&mut self) -> Option<Job> {
        if self.loading {
            debug!("sign-in refused, attempt in flight");
            return None;
        }
        if !self.form.form.validate() {
            return None;
        }

        self.loading = true;
        self.error_message = None;
        Some(Job::SignIn(self.form.credential()))
    }

    pub fn finish(&mut self, result: RemoteResult<Session>) {
        self.loading = false;
        match result {
            Ok(session) => {
                info!(user = ?session.user.email, "signed in");
                (self.navigate)(Route::Root);
            }
            Err(RemoteError::Cancelled) => debug!("sign-in cancelled"),
            Err(e) if e.is_service_error() => {
                warn!(error = %e, "sign-in rejected");
                self.error_message = Some(e.to_string());
            }
            Err(e) => {
                error!(error = %e, "unexpected sign-in failure");
                self.error_message = Some(UNEXPECTED_ERROR.to_string());
            }
        }
    }

    /// Drops the loading flag when the job could not be dispatched.
    pub fn abandon_pending(&mut self) {
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::Utc;
    use secrecy::{ExposeSecret, SecretString};

    use super::*;
    use crate::auth::User;

    fn control() -> (LoginControl, Arc<Mutex<Vec<Route>>>) {
        let routes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&routes);
        let navigate: Navigate = Arc::new(move |route| sink.lock().unwrap().push(route));
        (LoginControl::new(navigate), routes)
    }

    fn fill(control: &mut LoginControl, email: &str, password: &str) {
        let form = control.form_mut().form_mut();
        form.field_mut(EMAIL).value = email.to_string();
        form.field_mut(PASSWORD).value = password.to_string();
    }

    fn session() -> Session {
        Session {
            access_token: SecretString::from("token".to_string()),
            expires_at: Utc::now(),
            user: User { id: "u1".into(), email: Some("player@games.com".into()) },
        }
    }

    #[test]
    fn test_bad_email_blocks_submission() {
        let (mut control, _) = control();
        control.open();
        fill(&mut control, "bad-email", "x");

        assert!(control.submit().is_none());
        assert!(!control.is_loading());
        assert_eq!(control.form().email_error(), Some("Invalid e-mail"));
        assert_eq!(control.form().password_error(), None);
    }

    #[test]
    fn test_missing_fields() {
        let (mut control, _) = control();
        assert!(control.submit().is_none());
        assert_eq!(control.form().email_error(), Some("The e-mail field must be filled in"));
        assert_eq!(control.form().password_error(), Some("Fill in the password field"));
    }

    #[test]
    fn test_valid_submission_carries_credential() {
        let (mut control, _) = control();
        fill(&mut control, "Player@Games.com", "hunter2");

        match control.submit() {
            Some(Job::SignIn(credential)) => {
                assert_eq!(credential.email, "Player@Games.com");
                assert_eq!(credential.password().expose_secret(), "hunter2");
            }
            other => panic!("unexpected job: {:?}", other),
        }
        assert!(control.is_loading());
        assert!(control.submit().is_none());
    }

    #[test]
    fn test_success_navigates_to_root_once() {
        let (mut control, routes) = control();
        control.open();
        fill(&mut control, "player@games.com", "hunter2");
        control.submit().unwrap();
        control.finish(Ok(session()));

        assert!(!control.is_loading());
        assert_eq!(*routes.lock().unwrap(), vec![Route::Root]);
        assert_eq!(control.error_message(), None);
        // The control leaves its own open flag alone
        assert!(control.is_open());
    }

    #[test]
    fn test_service_error_is_shown() {
        let (mut control, routes) = control();
        fill(&mut control, "player@games.com", "wrong");
        control.submit().unwrap();
        control.finish(Err(RemoteError::Api { status: 400, message: "Invalid login credentials".into() }));

        assert!(!control.is_loading());
        assert_eq!(control.error_message(), Some("Invalid login credentials"));
        assert!(routes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unexpected_error_is_generic() {
        let (mut control, _) = control();
        fill(&mut control, "player@games.com", "hunter2");
        control.submit().unwrap();
        control.finish(Err(RemoteError::Timeout(Duration::from_secs(15))));

        assert!(!control.is_loading());
        assert_eq!(control.error_message(), Some(UNEXPECTED_ERROR));
    }

    #[test]
    fn test_retry_clears_previous_error() {
        let (mut control, _) = control();
        fill(&mut control, "player@games.com", "wrong");
        control.submit().unwrap();
        control.finish(Err(RemoteError::Decode("garbage".into())));
        assert!(control.error_message().is_some());

        control.submit().unwrap();
        assert_eq!(control.error_message(), None);
    }

    #[test]
    fn test_close_reports_in_flight_attempt() {
        let (mut control, _) = control();
        control.open();
        assert!(!control.close());

        control.open();
        fill(&mut control, "player@games.com", "hunter2");
        control.submit().unwrap();
        assert!(control.close());
        assert!(!control.is_loading());
        assert!(!control.is_open());
    }
}
