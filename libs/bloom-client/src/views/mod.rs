//! Screen state without the markup: what each page loads, derives and sends.

pub mod calendar;
pub mod profile;
pub mod settings;
pub mod tracker;

pub use calendar::{date_key, DayCell, MoodCalendar};
pub use profile::ProfileView;
pub use settings::{NotificationPrefs, PasswordChangeOutcome, PasswordForm, Settings};
pub use tracker::{MoodSlice, MoodTracker};
