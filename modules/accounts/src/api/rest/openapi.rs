use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::login,
        handlers::get_profile,
        handlers::update_profile,
        handlers::upload_profile_image,
        handlers::upload_prescription,
        handlers::delete_prescription,
    ),
    components(schemas(
        dto::RegisterReq,
        dto::LoginReq,
        dto::UpdateProfileReq,
        dto::PublicUserDto,
        dto::AuthResponseDto,
        dto::PrescriptionDto,
        dto::ProfileDto,
        dto::ImageUploadedDto,
        dto::MessageDto,
        dto::ProfileImageForm,
        dto::PrescriptionForm,
        apikit::Problem,
        apikit::ValidationError,
    )),
    tags((name = "users", description = "Registration, login, profile and uploads"))
)]
pub struct AccountsApi;
