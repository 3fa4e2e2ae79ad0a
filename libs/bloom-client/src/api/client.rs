use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::error::ClientError;
use super::models::{
    AuthResponse, ImageUploaded, LoginRequest, Message, MoodEntry, MoodSave, MoodStats,
    Prescription, Profile, ProfileUpdate, RegisterRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5002/api";

const MB: u64 = 1024 * 1024;
const MAX_PROFILE_IMAGE_BYTES: u64 = 5 * MB;
const MAX_PRESCRIPTION_BYTES: u64 = 10 * MB;

/// A file picked by the user, ready to send as multipart.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    fn into_part(self) -> Result<Part, ClientError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?)
    }
}

/// Typed client for the Bloomwell REST API. Protected calls take the bearer
/// token explicitly; callers read it from the [`crate::Session`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::Url(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Url(base_url.to_string()));
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(name = "bloom_client.api.register", skip_all, fields(email = %req.email))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let url = self.endpoint(&["users", "register"])?;
        send_json(self.http.post(url).json(req)).await
    }

    #[instrument(name = "bloom_client.api.login", skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let url = self.endpoint(&["users", "login"])?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        send_json(self.http.post(url).json(&body)).await
    }

    #[instrument(name = "bloom_client.api.get_profile", skip_all)]
    pub async fn get_profile(&self, token: &str) -> Result<Profile, ClientError> {
        let url = self.endpoint(&["users", "profile"])?;
        send_json(self.http.get(url).bearer_auth(token)).await
    }

    #[instrument(name = "bloom_client.api.update_profile", skip_all)]
    pub async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ClientError> {
        let url = self.endpoint(&["users", "profile"])?;
        send_json(self.http.put(url).bearer_auth(token).json(update)).await
    }

    /// Upload a profile picture and return its public URL. Only images up to
    /// 5 MB are sent.
    #[instrument(name = "bloom_client.api.upload_profile_image", skip_all, fields(file = %file.file_name))]
    pub async fn upload_profile_image(
        &self,
        token: &str,
        file: FileUpload,
    ) -> Result<String, ClientError> {
        if file.size() > MAX_PROFILE_IMAGE_BYTES {
            return Err(ClientError::InvalidFile(
                "File size should be less than 5MB".to_string(),
            ));
        }
        if !file.is_image() {
            return Err(ClientError::InvalidFile(
                "Please upload an image file (JPEG, PNG, etc.)".to_string(),
            ));
        }

        let url = self.endpoint(&["users", "upload-profile-image"])?;
        let form = Form::new().part("profileImage", file.into_part()?);
        let uploaded: ImageUploaded =
            send_json(self.http.post(url).bearer_auth(token).multipart(form)).await?;
        Ok(uploaded.image_url)
    }

    /// Upload a prescription (PDF or image, up to 10 MB).
    #[instrument(name = "bloom_client.api.upload_prescription", skip_all, fields(file = %file.file_name))]
    pub async fn upload_prescription(
        &self,
        token: &str,
        file: FileUpload,
    ) -> Result<Prescription, ClientError> {
        if file.size() > MAX_PRESCRIPTION_BYTES {
            return Err(ClientError::InvalidFile(
                "File size should be less than 10MB".to_string(),
            ));
        }
        if !(file.is_image() || file.content_type == "application/pdf") {
            return Err(ClientError::InvalidFile(
                "Please upload a PDF or image file".to_string(),
            ));
        }

        let url = self.endpoint(&["users", "upload-prescription"])?;
        let form = Form::new().part("prescription", file.into_part()?);
        send_json(self.http.post(url).bearer_auth(token).multipart(form)).await
    }

    #[instrument(name = "bloom_client.api.delete_prescription", skip_all, fields(prescription_id = %id))]
    pub async fn delete_prescription(&self, token: &str, id: &str) -> Result<String, ClientError> {
        let url = self.endpoint(&["users", "prescription", id])?;
        let msg: Message = send_json(self.http.delete(url).bearer_auth(token)).await?;
        Ok(msg.message)
    }

    #[instrument(name = "bloom_client.api.list_moods", skip_all)]
    pub async fn list_moods(&self, token: &str) -> Result<Vec<MoodEntry>, ClientError> {
        let url = self.endpoint(&["moods"])?;
        send_json(self.http.get(url).bearer_auth(token)).await
    }

    #[instrument(name = "bloom_client.api.save_mood", skip_all, fields(mood = ?save.mood))]
    pub async fn save_mood(&self, token: &str, save: &MoodSave) -> Result<MoodEntry, ClientError> {
        let url = self.endpoint(&["moods"])?;
        send_json(self.http.post(url).bearer_auth(token).json(save)).await
    }

    #[instrument(name = "bloom_client.api.mood_stats", skip_all)]
    pub async fn mood_stats(&self, token: &str) -> Result<MoodStats, ClientError> {
        let url = self.endpoint(&["moods", "stats"])?;
        send_json(self.http.get(url).bearer_auth(token)).await
    }
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
    let resp = check_status(req.send().await?).await?;
    Ok(resp.json::<T>().await?)
}

/// Turn non-2xx responses into `ClientError::Api`, preferring the problem
/// `detail`, then a legacy `message` field, then the status reason.
async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["detail", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
    debug!(status = status.as_u16(), %message, "API call failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
