//! Account profile

use emotune_common::api::ProfileResponse;
use serde::{Deserialize, Serialize};

/// Profile as shown and edited by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Avatar URL, if one was uploaded
    pub profile_pic: Option<String>,
}

impl From<ProfileResponse> for Profile {
    fn from(resp: ProfileResponse) -> Self {
        Self {
            firstname: resp.firstname.unwrap_or_default(),
            lastname: resp.lastname.unwrap_or_default(),
            email: resp.email.unwrap_or_default(),
            profile_pic: resp.profile_pic.filter(|p| !p.trim().is_empty()),
        }
    }
}
