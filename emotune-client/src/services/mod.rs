//! Backend service clients
//!
//! One reqwest client per service, built once with the configured timeout.
//! The capture workflow talks to the analysis and recommendation services
//! through traits so the controller can be driven without a network.

pub mod account_client;
pub mod analysis_client;
pub mod recommendation_client;

pub use account_client::AccountClient;
pub use analysis_client::{AnalysisClient, EmotionAnalyzer};
pub use recommendation_client::{RecommendationClient, RecommendationSource};

use std::time::Duration;

const USER_AGENT: &str = concat!("EmoTune/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client
pub(crate) fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Join the backend base URL and an endpoint path
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Render a transport error, calling out timeouts explicitly
pub(crate) fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("could not connect: {}", err)
    } else {
        err.to_string()
    }
}
