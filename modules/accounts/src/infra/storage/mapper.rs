use crate::contract::model::{Prescription, User};
use crate::infra::storage::entity::{prescription, user};

pub fn prescription_to_contract(m: prescription::Model) -> Prescription {
    Prescription {
        id: m.id,
        name: m.name,
        file_url: m.file_url,
        stored_path: m.stored_path,
        uploaded_at: m.uploaded_at,
    }
}

/// Convert a user row plus its prescription rows to a contract model.
pub fn user_to_contract(m: user::Model, prescriptions: Vec<prescription::Model>) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        date_of_birth: m.date_of_birth,
        gender: m.gender,
        phone: m.phone,
        profile_image: m.profile_image,
        prescriptions: prescriptions
            .into_iter()
            .map(prescription_to_contract)
            .collect(),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}
