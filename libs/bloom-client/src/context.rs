use std::sync::Arc;

use crate::api::ApiClient;
use crate::appointments::{Appointment, AppointmentBook, Doctor};
use crate::cart::{Cart, Product};
use crate::notify::Notifier;
use crate::session::Session;
use crate::store::{LocalStore, StoreError};

/// Everything the screens share, built once at startup.
pub struct AppContext {
    pub api: ApiClient,
    pub session: Session,
    pub cart: Cart,
    pub appointments: AppointmentBook,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Hydrate the session, cart and appointments from `store`.
    pub fn new(api: ApiClient, store: Arc<dyn LocalStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session: Session::new(store.clone()),
            cart: Cart::load(store.clone()),
            appointments: AppointmentBook::load(store),
            notifier,
        }
    }

    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), StoreError> {
        self.cart.add(product)?;
        self.notifier.success(&format!("{} added to cart!", product.name));
        Ok(())
    }

    pub fn book_appointment(&mut self, doctor: &Doctor) -> Result<Appointment, StoreError> {
        let appointment = self.appointments.book(doctor)?;
        self.notifier.success(&format!(
            "Appointment booked successfully! Contact {} at {}",
            doctor.name, doctor.phone
        ));
        Ok(appointment)
    }

    pub fn cancel_appointment(&mut self, id: i64) -> Result<bool, StoreError> {
        let found = self.appointments.cancel(id)?;
        if found {
            self.notifier.info("Appointment cancelled successfully");
        }
        Ok(found)
    }

    pub fn delete_appointment(&mut self, id: i64) -> Result<bool, StoreError> {
        let found = self.appointments.delete(id)?;
        if found {
            self.notifier.success("Appointment deleted");
        }
        Ok(found)
    }
}
