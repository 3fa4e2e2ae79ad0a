use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{AuthSession, NewUser, Prescription, ProfilePatch, User};
use crate::domain::error::DomainError;
use crate::domain::validation::parse_date_of_birth;

/// Registration payload. Missing required fields surface as validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Partial profile update; absent or empty fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
}

/// Public projection returned with a token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub token: String,
    pub user: PublicUserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    pub id: Uuid,
    pub name: String,
    pub file_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Full profile, never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub prescriptions: Vec<PrescriptionDto>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadedDto {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub message: String,
}

/// Multipart form for `POST /api/users/upload-profile-image`.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct ProfileImageForm {
    #[serde(rename = "profileImage")]
    #[schema(value_type = String, format = Binary)]
    pub profile_image: Vec<u8>,
}

/// Multipart form for `POST /api/users/upload-prescription`.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct PrescriptionForm {
    #[schema(value_type = String, format = Binary)]
    pub prescription: Vec<u8>,
}

impl TryFrom<RegisterReq> for NewUser {
    type Error = DomainError;

    fn try_from(req: RegisterReq) -> Result<Self, Self::Error> {
        Ok(Self {
            date_of_birth: parse_date_of_birth(req.date_of_birth.as_deref())?,
            name: req.name,
            email: req.email,
            password: req.password,
            gender: req.gender,
            phone: req.phone,
        })
    }
}

impl TryFrom<UpdateProfileReq> for ProfilePatch {
    type Error = DomainError;

    fn try_from(req: UpdateProfileReq) -> Result<Self, Self::Error> {
        Ok(Self {
            date_of_birth: parse_date_of_birth(req.date_of_birth.as_deref())?,
            name: req.name,
            gender: req.gender,
            phone: req.phone,
        })
    }
}

impl From<User> for PublicUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            gender: u.gender,
            date_of_birth: u.date_of_birth,
            phone: u.phone,
        }
    }
}

impl From<AuthSession> for AuthResponseDto {
    fn from(s: AuthSession) -> Self {
        Self {
            token: s.token,
            user: s.user.into(),
        }
    }
}

impl From<Prescription> for PrescriptionDto {
    fn from(p: Prescription) -> Self {
        Self {
            id: p.id,
            name: p.name,
            file_url: p.file_url,
            uploaded_at: p.uploaded_at,
        }
    }
}

impl From<User> for ProfileDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            date_of_birth: u.date_of_birth,
            gender: u.gender,
            phone: u.phone,
            profile_image: u.profile_image,
            prescriptions: u.prescriptions.into_iter().map(Into::into).collect(),
            created_at: u.created_at,
        }
    }
}
