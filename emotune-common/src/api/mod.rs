//! Backend API vocabulary
//!
//! Endpoint paths and the request/response shapes the backend speaks.
//!
//! # Design Principle
//!
//! This module contains ONLY:
//! - Wire types exactly as the backend serializes them (loose, optional fields)
//! - Endpoint path constants
//!
//! Validation into domain types (EmotionResult, Recommendation) happens in
//! the client crate at the ingestion boundary.

pub mod types;

pub use types::{
    ChangePasswordForm, CheckUserRequest, DetectEmotionResponse, ErrorBody,
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RecommendationItem, RegisterRequest, UpdateProfileRequest, UploadProfilePicResponse,
};

/// Endpoint paths, relative to the configured backend URL
pub mod paths {
    pub const DETECT_EMOTION: &str = "/detect-emotion";
    pub const RECOMMENDATIONS: &str = "/recommendations";
    pub const REGISTER: &str = "/register";
    pub const LOGIN: &str = "/login";
    pub const CHECK_USER: &str = "/check-user";
    pub const FORGOT_PASSWORD: &str = "/forgot-password";
    pub const SEND_RESET_LINK: &str = "/send-reset-link";
    pub const PROFILE: &str = "/profile";
    pub const UPDATE_PROFILE: &str = "/update-profile";
    pub const UPLOAD_PROFILE_PIC: &str = "/upload-profile-pic";
    pub const CHANGE_PASSWORD: &str = "/change-password";
}
