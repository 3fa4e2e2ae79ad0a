use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{load_json, save_json, LocalStore, StoreError};

const APPOINTMENTS_KEY: &str = "appointments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialization: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Unix millis at booking time, bumped when needed to stay unique.
    pub id: i64,
    pub doctor_id: u32,
    pub doctor_name: String,
    pub specialization: String,
    pub phone: String,
    pub address: String,
    pub status: AppointmentStatus,
    pub date: DateTime<Utc>,
}

/// Appointments booked from this device. They never reach the server.
pub struct AppointmentBook {
    store: Arc<dyn LocalStore>,
    items: Vec<Appointment>,
}

impl AppointmentBook {
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let items = load_json(store.as_ref(), APPOINTMENTS_KEY).unwrap_or_default();
        Self { store, items }
    }

    pub fn list(&self) -> &[Appointment] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&Appointment> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn book(&mut self, doctor: &Doctor) -> Result<Appointment, StoreError> {
        self.book_at(doctor, Utc::now())
    }

    pub fn book_at(&mut self, doctor: &Doctor, now: DateTime<Utc>) -> Result<Appointment, StoreError> {
        let last = self.items.iter().map(|a| a.id).max().unwrap_or(i64::MIN);
        let id = now.timestamp_millis().max(last.saturating_add(1));

        let appointment = Appointment {
            id,
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
            phone: doctor.phone.clone(),
            address: doctor.address.clone(),
            status: AppointmentStatus::Pending,
            date: now,
        };
        let mut items = self.items.clone();
        items.push(appointment.clone());
        self.commit(items)?;
        tracing::info!(appointment_id = id, doctor_id = doctor.id, "Appointment booked");
        Ok(appointment)
    }

    /// Returns false when no appointment has `id`.
    pub fn update_status(&mut self, id: i64, status: AppointmentStatus) -> Result<bool, StoreError> {
        let mut items = self.items.clone();
        let Some(a) = items.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        a.status = status;
        self.commit(items)?;
        Ok(true)
    }

    pub fn cancel(&mut self, id: i64) -> Result<bool, StoreError> {
        self.update_status(id, AppointmentStatus::Cancelled)
    }

    pub fn delete(&mut self, id: i64) -> Result<bool, StoreError> {
        let mut items = self.items.clone();
        items.retain(|a| a.id != id);
        if items.len() == self.items.len() {
            return Ok(false);
        }
        self.commit(items)?;
        Ok(true)
    }

    /// Write `items` first; the in-memory list changes only if that succeeds.
    fn commit(&mut self, items: Vec<Appointment>) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), APPOINTMENTS_KEY, &items)?;
        self.items = items;
        Ok(())
    }
}
