//! Backend request/response types
//!
//! Response types keep every field optional: the backend is trusted for
//! transport only, not for field presence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================
// Capture Workflow Types
// ========================================

/// `POST /detect-emotion` response
///
/// # Examples
///
/// ```
/// use emotune_common::api::types::DetectEmotionResponse;
///
/// let body: DetectEmotionResponse =
///     serde_json::from_str(r#"{"emotion": "happy", "confidence": 0.87}"#).unwrap();
/// assert_eq!(body.emotion.as_deref(), Some("happy"));
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetectEmotionResponse {
    /// Label, or null when nothing was classified
    #[serde(default)]
    pub emotion: Option<String>,
    /// Classifier confidence (0.0 to 1.0)
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// One element of the `GET /recommendations` array
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecommendationItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album_art: Option<String>,
    /// 30-second preview (often null upstream)
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Inline player URL
    #[serde(default)]
    pub embed_url: Option<String>,
}

// ========================================
// Account Types
// ========================================

/// `POST /register` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// `POST /login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /login` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// First name of the account
    #[serde(default)]
    pub username: Option<String>,
}

/// `POST /check-user` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckUserRequest {
    pub email: String,
}

/// `POST /forgot-password` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub new_password: String,
}

/// `GET /profile` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// `PUT /update-profile` body
///
/// `password` is always sent empty: this call never changes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// Fields of the `POST /change-password` multipart form
#[derive(Debug, Clone)]
pub struct ChangePasswordForm {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

/// `POST /upload-profile-pic` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadProfilePicResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Generic `{ "message": ... }` response
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ========================================
// Error Response Types
// ========================================

/// Backend error body (`{"detail": ...}`)
///
/// `detail` is a string for application errors and a list for request
/// validation errors.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Parse an error body, tolerating non-JSON text
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// Human-readable detail, if the body carried one
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_response_tolerates_null_emotion() {
        let body: DetectEmotionResponse = serde_json::from_str(r#"{"emotion": null}"#).unwrap();
        assert!(body.emotion.is_none());
        assert!(body.confidence.is_none());
    }

    #[test]
    fn test_recommendation_item_tolerates_missing_fields() {
        let item: RecommendationItem =
            serde_json::from_str(r#"{"title": "Song", "album_art": null}"#).unwrap();
        assert_eq!(item.title.as_deref(), Some("Song"));
        assert!(item.artist.is_none());
        assert!(item.embed_url.is_none());
    }

    #[test]
    fn test_error_body_string_detail() {
        let body = ErrorBody::parse(r#"{"detail": "No face detected. Please face the camera clearly."}"#);
        assert_eq!(
            body.message().as_deref(),
            Some("No face detected. Please face the camera clearly.")
        );
    }

    #[test]
    fn test_error_body_non_json() {
        assert!(ErrorBody::parse("Internal Server Error").message().is_none());
    }

    #[test]
    fn test_error_body_list_detail_is_stringified() {
        let body = ErrorBody::parse(r#"{"detail": [{"loc": ["body", "email"]}]}"#);
        assert!(body.message().unwrap().contains("email"));
    }

    #[test]
    fn test_update_profile_serialization() {
        let req = UpdateProfileRequest {
            firstname: "Ana".to_string(),
            lastname: "Ray".to_string(),
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["password"], "");
        assert_eq!(json["firstname"], "Ana");
    }
}
