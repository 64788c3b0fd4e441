use crate::auth::Session;
use crate::remote::RemoteResult;
use crate::tasks::TaskKey;
use crate::ui::components::MessageType;

use super::App;

impl App {
    pub(super) fn open_login(&mut self) {
        self.login.open();
        self.mode_state.to_login();
    }

    pub(super) fn close_login(&mut self) {
        if self.login.close() {
            self.tasks.cancel(&TaskKey::Login);
        }
        self.mode_state.to_normal();
    }

    pub(super) fn submit_login(&mut self) {
        let Some(job) = self.login.submit() else { return };
        if !self.dispatch(job) {
            self.login.abandon_pending();
        }
    }

    pub(super) fn finish_sign_in(&mut self, result: RemoteResult<Session>) {
        let user = result.as_ref().ok().map(|session| session.user.clone());
        self.login.finish(result);

        if let Some(user) = user {
            let name = user.email.clone().unwrap_or_else(|| user.id.clone());
            self.set_message(&format!("Signed in as {}", name), MessageType::Success);
            self.user = Some(user);
        }
    }
}
