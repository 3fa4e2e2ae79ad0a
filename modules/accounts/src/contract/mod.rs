pub mod model;

pub use model::{
    AuthSession, IncomingFile, NewUser, Prescription, ProfilePatch, User,
};
