use tracing::warn;

use crate::api::models::{Profile, ProfileUpdate};
use crate::api::{ClientError, FileUpload};
use crate::context::AppContext;

/// Profile page: details, picture and prescriptions.
#[derive(Debug, Clone)]
pub struct ProfileView {
    profile: Option<Profile>,
    loading: bool,
}

impl Default for ProfileView {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileView {
    pub fn new() -> Self {
        Self {
            profile: None,
            loading: true,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn load(&mut self, ctx: &AppContext) -> Result<(), ClientError> {
        let result = match ctx.session.require_token() {
            Ok(token) => ctx.api.get_profile(&token).await,
            Err(e) => Err(e),
        };
        self.loading = false;
        match result {
            Ok(p) => {
                self.profile = Some(p);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Profile fetch failed");
                ctx.notifier.error("Error loading profile");
                Err(e)
            }
        }
    }

    pub async fn update(
        &mut self,
        ctx: &AppContext,
        update: &ProfileUpdate,
    ) -> Result<(), ClientError> {
        let token = ctx.session.require_token()?;
        match ctx.api.update_profile(&token, update).await {
            Ok(p) => {
                self.profile = Some(p);
                ctx.notifier.success("Profile updated successfully!");
                Ok(())
            }
            Err(e) => {
                ctx.notifier.error("Error updating profile");
                Err(e)
            }
        }
    }

    pub async fn upload_image(
        &mut self,
        ctx: &AppContext,
        file: FileUpload,
    ) -> Result<String, ClientError> {
        let token = ctx.session.require_token()?;
        match ctx.api.upload_profile_image(&token, file).await {
            Ok(url) => {
                if let Some(p) = self.profile.as_mut() {
                    p.profile_image = Some(url.clone());
                }
                ctx.notifier.success("Profile picture updated successfully!");
                Ok(url)
            }
            Err(e) => {
                ctx.notifier
                    .error(&e.user_message("Error uploading profile picture"));
                Err(e)
            }
        }
    }

    pub async fn upload_prescription(
        &mut self,
        ctx: &AppContext,
        file: FileUpload,
    ) -> Result<(), ClientError> {
        let token = ctx.session.require_token()?;
        match ctx.api.upload_prescription(&token, file).await {
            Ok(prescription) => {
                if let Some(p) = self.profile.as_mut() {
                    p.prescriptions.push(prescription);
                }
                ctx.notifier.success("Prescription uploaded successfully!");
                Ok(())
            }
            Err(e) => {
                ctx.notifier
                    .error(&e.user_message("Error uploading prescription"));
                Err(e)
            }
        }
    }

    pub async fn delete_prescription(&mut self, ctx: &AppContext, id: &str) -> Result<(), ClientError> {
        let token = ctx.session.require_token()?;
        match ctx.api.delete_prescription(&token, id).await {
            Ok(_) => {
                if let Some(p) = self.profile.as_mut() {
                    p.prescriptions.retain(|rx| rx.id != id);
                }
                ctx.notifier.success("Prescription deleted successfully");
                Ok(())
            }
            Err(e) => {
                ctx.notifier.error("Error deleting prescription");
                Err(e)
            }
        }
    }
}
