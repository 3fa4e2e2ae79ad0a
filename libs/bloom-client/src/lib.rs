//! Client-side state for Bloomwell: durable local storage, cart and
//! appointment containers, the session, a typed REST client and the view
//! models that drive the calendar, tracking, profile and settings screens.
//!
//! Nothing here is global. An [`AppContext`] is built once and handed to the
//! view models that need it.

pub mod api;
pub mod appointments;
pub mod cart;
pub mod context;
pub mod notify;
pub mod session;
pub mod store;
pub mod views;

pub use api::{ApiClient, ClientError, FileUpload};
pub use appointments::{Appointment, AppointmentBook, AppointmentStatus, Doctor};
pub use cart::{Cart, CartItem, CheckoutOutcome, Product};
pub use context::AppContext;
pub use notify::{Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use session::{AuthState, Session};
pub use store::{JsonFileStore, LocalStore, MemoryStore, StoreError};
