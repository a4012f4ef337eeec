//! Client session: signed-in account and theme
//!
//! Initialized once from the preference store at startup. Logout is the only
//! place the stored session email is cleared, and it also resets the capture
//! workflow so no image or result from the old session survives.

use crate::error::AccountError;
use crate::services::AccountClient;
use crate::workflow::CaptureWorkflowController;
use chrono::Utc;
use emotune_common::api::RegisterRequest;
use emotune_common::events::{ClientEvent, EventBus};
use emotune_common::preferences::{PreferenceStore, Preferences, Theme};
use tracing::info;

/// Longest display name shown before truncation
pub const DISPLAY_NAME_MAX_CHARS: usize = 15;

pub struct Session {
    store: PreferenceStore,
    prefs: Preferences,
    user_name: Option<String>,
    event_bus: EventBus,
}

impl Session {
    /// Read persisted preferences
    pub fn load(store: PreferenceStore, event_bus: EventBus) -> Result<Self, AccountError> {
        let prefs = store.load()?;
        info!(
            theme = prefs.theme.as_str(),
            signed_in = prefs.session_email.is_some(),
            "Session loaded"
        );
        Ok(Self {
            store,
            prefs,
            user_name: None,
            event_bus,
        })
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, AccountError> {
        self.prefs = self.store.set_theme(theme)?;
        Ok(self.prefs.theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, AccountError> {
        self.set_theme(self.prefs.theme.toggled())
    }

    pub fn session_email(&self) -> Option<&str> {
        self.prefs.session_email.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.prefs.session_email.is_some()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// User name for the header, truncated with "..." past 15 characters
    pub fn display_name(&self) -> Option<String> {
        self.user_name.as_deref().map(truncate_name)
    }

    /// Log in and remember the account email
    pub async fn login(
        &mut self,
        client: &AccountClient,
        email: &str,
        password: &str,
    ) -> Result<String, AccountError> {
        let user_name = client.login(email, password).await?;
        self.prefs = self.store.remember_session(email)?;
        self.user_name = Some(user_name.clone());
        info!(user = %user_name, "Logged in");
        self.event_bus.emit_lossy(ClientEvent::SessionStarted {
            user_name: user_name.clone(),
            timestamp: Utc::now(),
        });
        Ok(user_name)
    }

    /// Register and remember the new account's email
    pub async fn register(
        &mut self,
        client: &AccountClient,
        request: &RegisterRequest,
    ) -> Result<String, AccountError> {
        let message = client.register(request).await?;
        self.prefs = self.store.remember_session(&request.email)?;
        Ok(message)
    }

    /// Forget the account and reset the capture workflow
    pub async fn logout(&mut self, controller: &CaptureWorkflowController) -> Result<(), AccountError> {
        self.user_name = None;
        self.prefs = self.store.clear_session()?;
        controller.reset().await;
        info!("Logged out");
        self.event_bus.emit_lossy(ClientEvent::SessionEnded {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Email of the signed-in account, or `NotLoggedIn`
    pub fn require_email(&self) -> Result<&str, AccountError> {
        self.session_email().ok_or(AccountError::NotLoggedIn)
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > DISPLAY_NAME_MAX_CHARS {
        let head: String = name.chars().take(DISPLAY_NAME_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}
