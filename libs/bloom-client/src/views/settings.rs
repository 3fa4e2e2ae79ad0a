use crate::context::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub email: bool,
    pub sms: bool,
    pub promotions: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            promotions: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChangeOutcome {
    Mismatch,
    /// The API has no password change endpoint.
    Unsupported,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub notifications: NotificationPrefs,
    pub password: PasswordForm,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_notifications(&self, ctx: &AppContext) {
        ctx.notifier.success("Notification preferences saved!");
    }

    /// Check the form; nothing is sent to the server.
    pub fn submit_password(&mut self, ctx: &AppContext) -> PasswordChangeOutcome {
        if self.password.new != self.password.confirm {
            ctx.notifier.error("New passwords do not match");
            return PasswordChangeOutcome::Mismatch;
        }
        ctx.notifier.info("Password changes are not available yet");
        self.password = PasswordForm::default();
        PasswordChangeOutcome::Unsupported
    }
}
