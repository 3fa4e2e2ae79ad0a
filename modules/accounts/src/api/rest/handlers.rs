use std::sync::Arc;

use apikit::{from_parts, ProblemResponse};
use authn::AuthUser;
use axum::{
    extract::{multipart::MultipartError, Multipart, OriginalUri, Path},
    http::StatusCode,
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    AuthResponseDto, ImageUploadedDto, LoginReq, MessageDto, PrescriptionDto, ProfileDto,
    RegisterReq, UpdateProfileReq,
};
use crate::api::rest::error::map_domain_error;
use crate::contract::model::{IncomingFile, NewUser, ProfilePatch};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Registered", body = AuthResponseDto),
        (status = 400, description = "Validation error or email already registered", body = apikit::Problem)
    )
)]
pub async fn register(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<RegisterReq>,
) -> Result<(StatusCode, Json<AuthResponseDto>), ProblemResponse> {
    info!(email = %req_body.email, "Registering user");

    let result = match NewUser::try_from(req_body) {
        Ok(new_user) => svc.register(new_user).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(session) => Ok((StatusCode::CREATED, Json(session.into()))),
        Err(e) => {
            info!("Registration rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in", body = AuthResponseDto),
        (status = 400, description = "Invalid credentials", body = apikit::Problem)
    )
)]
pub async fn login(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<LoginReq>,
) -> Result<Json<AuthResponseDto>, ProblemResponse> {
    match svc.login(&req_body.email, &req_body.password).await {
        Ok(session) => Ok(Json(session.into())),
        Err(e) => {
            info!("Login rejected: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = ProfileDto),
        (status = 401, description = "Unauthorized", body = apikit::Problem),
        (status = 404, description = "User no longer exists", body = apikit::Problem)
    )
)]
pub async fn get_profile(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    match svc.get_profile(user.user_id).await {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to load profile {}: {}", user.user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update name, date of birth, gender or phone
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = ProfileDto),
        (status = 400, description = "Validation error", body = apikit::Problem),
        (status = 401, description = "Unauthorized", body = apikit::Problem)
    )
)]
pub async fn update_profile(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
    Json(req_body): Json<UpdateProfileReq>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    let result = match ProfilePatch::try_from(req_body) {
        Ok(patch) => svc.update_profile(user.user_id, patch).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(u) => Ok(Json(u.into())),
        Err(e) => {
            error!("Failed to update profile {}: {}", user.user_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Upload a profile image
#[utoipa::path(
    post,
    path = "/api/users/upload-profile-image",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body(content = crate::api::rest::dto::ProfileImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored", body = ImageUploadedDto),
        (status = 400, description = "Missing, unsupported or oversized file", body = apikit::Problem),
        (status = 401, description = "Unauthorized", body = apikit::Problem)
    )
)]
pub async fn upload_profile_image(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ImageUploadedDto>, ProblemResponse> {
    let file = read_file_field(multipart, "profileImage", svc.max_upload_bytes(), uri.path())
        .await?;
    match svc.upload_profile_image(user.user_id, file).await {
        Ok(image_url) => Ok(Json(ImageUploadedDto { image_url })),
        Err(e) => {
            error!("Profile image upload failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Upload a prescription document
#[utoipa::path(
    post,
    path = "/api/users/upload-prescription",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body(content = crate::api::rest::dto::PrescriptionForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored", body = PrescriptionDto),
        (status = 400, description = "Missing, unsupported or oversized file", body = apikit::Problem),
        (status = 401, description = "Unauthorized", body = apikit::Problem)
    )
)]
pub async fn upload_prescription(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<PrescriptionDto>, ProblemResponse> {
    let file = read_file_field(multipart, "prescription", svc.max_upload_bytes(), uri.path())
        .await?;
    match svc.upload_prescription(user.user_id, file).await {
        Ok(p) => Ok(Json(p.into())),
        Err(e) => {
            error!("Prescription upload failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete one of the caller's prescriptions
#[utoipa::path(
    delete,
    path = "/api/users/prescription/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "Deleted", body = MessageDto),
        (status = 401, description = "Unauthorized", body = apikit::Problem),
        (status = 404, description = "Not found", body = apikit::Problem)
    )
)]
pub async fn delete_prescription(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageDto>, ProblemResponse> {
    match svc.delete_prescription(user.user_id, &id).await {
        Ok(()) => Ok(Json(MessageDto {
            message: "Prescription deleted successfully".to_string(),
        })),
        Err(e) => {
            info!("Prescription delete failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

fn multipart_problem(e: MultipartError, instance: &str) -> ProblemResponse {
    from_parts(
        e.status(),
        "UPLOAD_MALFORMED",
        "Malformed upload",
        e.body_text(),
        instance,
    )
}

/// Read the file part named `field_name`, skipping every other part. Stops
/// reading once the part exceeds `max_bytes`.
async fn read_file_field(
    mut multipart: Multipart,
    field_name: &str,
    max_bytes: u64,
    instance: &str,
) -> Result<Option<IncomingFile>, ProblemResponse> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_problem(e, instance))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_problem(e, instance))?
        {
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 > max_bytes {
                let e = DomainError::file_too_large(bytes.len() as u64, max_bytes);
                return Err(map_domain_error(&e, instance));
            }
        }
        return Ok(Some(IncomingFile {
            original_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}
