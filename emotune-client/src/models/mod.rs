//! Domain models shared by the capture workflow and the account calls

mod captured_image;
mod profile;
mod recommendation;

pub use captured_image::{CapturedImage, FileBlob};
pub use profile::Profile;
pub use recommendation::{normalize_recommendations, Recommendation};
