//! Account API client
//!
//! Login, registration, password reset and profile calls. Every non-2xx
//! answer becomes `AccountError::Rejected` carrying the backend's `detail`
//! text, which is what the user gets to see.

use super::{describe_transport_error, endpoint, http_client};
use crate::error::AccountError;
use crate::models::{CapturedImage, Profile};
use emotune_common::api::{
    paths, ChangePasswordForm, CheckUserRequest, ErrorBody, ForgotPasswordRequest, LoginRequest,
    LoginResponse, MessageResponse, ProfileResponse, RegisterRequest, UpdateProfileRequest,
    UploadProfilePicResponse,
};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the account endpoints
pub struct AccountClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AccountClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AccountError> {
        let http_client =
            http_client(timeout).map_err(|e| AccountError::NetworkError(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    /// Create an account
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, AccountError> {
        require(&request.email, "Email is required.")?;
        require(&request.password, "Password is required.")?;

        tracing::debug!(email = %request.email, "Registering account");
        let response = self
            .http_client
            .post(self.url(paths::REGISTER))
            .json(request)
            .send()
            .await
            .map_err(network)?;
        let body: MessageResponse = read_json(response).await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Registered successfully! Please log in.".to_string()))
    }

    /// Log in; returns the account's display name
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        tracing::debug!(email = %request.email, "Logging in");
        let response = self
            .http_client
            .post(self.url(paths::LOGIN))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        let body: LoginResponse = read_json(response).await?;
        body.username
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                AccountError::ParseError("Login successful but user info missing.".to_string())
            })
    }

    /// True if an account exists for `email`
    pub async fn check_user(&self, email: &str) -> Result<bool, AccountError> {
        let request = CheckUserRequest {
            email: email.trim().to_lowercase(),
        };
        let response = self
            .http_client
            .post(self.url(paths::CHECK_USER))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        match read_json::<MessageResponse>(response).await {
            Ok(_) => Ok(true),
            Err(AccountError::Rejected { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Set a new password for `email` (reset-link landing flow)
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<String, AccountError> {
        require(email, "Email is required.")?;
        require(new_password, "Email and new password are required.")?;
        if new_password != confirm {
            return Err(AccountError::InvalidInput("Passwords don't match.".to_string()));
        }

        let request = ForgotPasswordRequest {
            email: email.trim().to_lowercase(),
            new_password: new_password.to_string(),
        };
        let response = self
            .http_client
            .post(self.url(paths::FORGOT_PASSWORD))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        let body: MessageResponse = read_json(response).await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Password reset successful!".to_string()))
    }

    /// Ask the backend to email a reset link
    pub async fn send_reset_link(&self, email: &str) -> Result<String, AccountError> {
        require(email, "Please enter your registered email.")?;

        let form = multipart::Form::new().text("email", email.trim().to_string());
        let response = self
            .http_client
            .post(self.url(paths::SEND_RESET_LINK))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        let body: MessageResponse = read_json(response).await?;
        Ok(body
            .message
            .unwrap_or_else(|| "Reset link sent successfully.".to_string()))
    }

    pub async fn fetch_profile(&self, email: &str) -> Result<Profile, AccountError> {
        require(email, "No account email stored; log in first.")?;

        let response = self
            .http_client
            .get(self.url(paths::PROFILE))
            .query(&[("email", email.trim())])
            .send()
            .await
            .map_err(network)?;
        let body: ProfileResponse = read_json(response).await?;
        Ok(Profile::from(body))
    }

    /// Save name fields; the password is left untouched
    pub async fn update_profile(&self, profile: &Profile) -> Result<(), AccountError> {
        let request = UpdateProfileRequest {
            firstname: profile.firstname.clone(),
            lastname: profile.lastname.clone(),
            email: profile.email.clone(),
            password: String::new(),
        };
        let response = self
            .http_client
            .put(self.url(paths::UPDATE_PROFILE))
            .json(&request)
            .send()
            .await
            .map_err(network)?;
        read_json::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Upload an avatar; returns its public URL
    pub async fn upload_profile_pic(
        &self,
        email: &str,
        image: &CapturedImage,
    ) -> Result<String, AccountError> {
        require(email, "No account email stored; log in first.")?;

        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.filename().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| AccountError::InvalidInput(e.to_string()))?;
        let form = multipart::Form::new()
            .text("email", email.trim().to_string())
            .part("file", part);

        let response = self
            .http_client
            .post(self.url(paths::UPLOAD_PROFILE_PIC))
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        let body: UploadProfilePicResponse = read_json(response).await?;
        body.url
            .ok_or_else(|| AccountError::ParseError("upload response has no url".to_string()))
    }

    pub async fn change_password(&self, form: &ChangePasswordForm) -> Result<(), AccountError> {
        if form.old_password.is_empty() || form.new_password.is_empty() {
            return Err(AccountError::InvalidInput(
                "Fill both password fields.".to_string(),
            ));
        }
        require(&form.email, "No account email stored; log in first.")?;

        let multipart = multipart::Form::new()
            .text("email", form.email.trim().to_string())
            .text("old_password", form.old_password.clone())
            .text("new_password", form.new_password.clone());
        let response = self
            .http_client
            .post(self.url(paths::CHANGE_PASSWORD))
            .multipart(multipart)
            .send()
            .await
            .map_err(network)?;
        read_json::<MessageResponse>(response).await?;
        Ok(())
    }
}

fn require(value: &str, message: &str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        Err(AccountError::InvalidInput(message.to_string()))
    } else {
        Ok(())
    }
}

fn network(err: reqwest::Error) -> AccountError {
    AccountError::NetworkError(describe_transport_error(&err))
}

/// Decode a 2xx body, or turn the error body into `Rejected`
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AccountError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let detail = ErrorBody::parse(&text)
            .message()
            .unwrap_or_else(|| "Something went wrong.".to_string());
        tracing::warn!(status = status.as_u16(), detail = %detail, "Account request rejected");
        return Err(AccountError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }
    response
        .json()
        .await
        .map_err(|e| AccountError::ParseError(e.to_string()))
}
