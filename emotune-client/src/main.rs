//! EmoTune client (emotune) - Main entry point
//!
//! Terminal front end for the EmoTune backend: analyze a photo or camera
//! frame, list the recommended songs, and manage the signed-in account.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use emotune_client::capture::{FrameFileCamera, ImageIngestAdapter};
use emotune_client::display::render_state;
use emotune_client::models::{FileBlob, Recommendation};
use emotune_client::services::{AccountClient, AnalysisClient, RecommendationClient};
use emotune_client::session::Session;
use emotune_client::workflow::{CaptureWorkflowController, InputMode, WorkflowState};
use emotune_client::{AccountError, CaptureError};
use emotune_common::api::{ChangePasswordForm, RegisterRequest};
use emotune_common::config::{ClientConfig, ConfigResolver};
use emotune_common::events::{ClientEvent, EventBus, NoticeLevel};
use emotune_common::preferences::{PreferenceStore, Theme};
use emotune_common::Language;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};

/// Command-line arguments for emotune
#[derive(Parser, Debug)]
#[command(name = "emotune")]
#[command(about = "Emotion-driven music recommendations")]
#[command(version)]
struct Cli {
    /// Config file (overrides EMOTUNE_CONFIG and the default location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "EMOTUNE_BACKEND_URL")]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the emotion in a photo and list matching songs
    Analyze {
        /// Image file to upload
        #[arg(long, conflicts_with_all = ["data_uri", "camera"])]
        image: Option<PathBuf>,

        /// Base64 data URI of an image
        #[arg(long, conflicts_with = "camera")]
        data_uri: Option<String>,

        /// Take a snapshot from the configured camera
        #[arg(long)]
        camera: bool,

        /// Recommendation language (defaults to the configured one)
        #[arg(short, long)]
        language: Option<Language>,

        /// Select song N (1-based) for the player
        #[arg(long)]
        select: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and remember the account
    Login {
        email: String,
        #[arg(long, env = "EMOTUNE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        firstname: String,
        lastname: String,
        email: String,
        #[arg(long, env = "EMOTUNE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the signed-in account
    Logout,

    /// Check whether an account exists
    CheckUser { email: String },

    /// Email a password reset link
    SendResetLink { email: String },

    /// Set a new password
    ResetPassword {
        email: String,
        new_password: String,
        confirm: String,
    },

    /// Profile of the signed-in account
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Change or toggle the display theme
    Theme {
        #[arg(value_enum, default_value = "toggle")]
        action: ThemeAction,
    },

    /// List recommendation languages
    Languages,
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    Show,
    Update { firstname: String, lastname: String },
    /// Upload a profile picture
    Avatar { path: PathBuf },
    Password { old_password: String, new_password: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

/// `analyze --json` output
#[derive(Serialize)]
struct AnalysisReport<'a> {
    emotion: Option<&'static str>,
    confidence: Option<f64>,
    language: &'static str,
    songs: &'a [Recommendation],
    player_url: Option<String>,
    error: Option<&'a str>,
}

impl<'a> From<&'a WorkflowState> for AnalysisReport<'a> {
    fn from(state: &'a WorkflowState) -> Self {
        Self {
            emotion: state.emotion.map(|e| e.label.as_str()),
            confidence: state.emotion.map(|e| e.confidence),
            language: state.language.as_str(),
            songs: &state.recommendations,
            player_url: state.selected_track.as_ref().and_then(|t| t.player_url()),
            error: state.notice.as_ref().map(|n| n.message.as_str()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ConfigResolver::new(cli.config.as_deref())
        .resolve()
        .context("Failed to load configuration")?;
    if let Some(url) = &cli.backend_url {
        config.set_backend_url(url)?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting EmoTune client v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    debug!(backend_url = %config.backend_url, "Configuration resolved");

    let event_bus = EventBus::new(64);
    let mut notices = event_bus.subscribe();
    let store = PreferenceStore::new(config.preferences_path());
    let mut session = Session::load(store, event_bus.clone())?;

    let code = match cli.command {
        Command::Analyze {
            image,
            data_uri,
            camera,
            language,
            select,
            json,
        } => {
            let controller = build_controller(&config, event_bus.clone())?;
            if let Some(language) = language {
                controller.set_language(language).await;
            }
            let outcome = analyze(&controller, image, data_uri, camera, select).await;
            print_notices(&mut notices);
            match outcome {
                Ok(state) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&AnalysisReport::from(&state))?);
                    } else {
                        print!("{}", render_state(&state));
                    }
                    if state.notice.is_some() {
                        ExitCode::FAILURE
                    } else {
                        ExitCode::SUCCESS
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Analyze rejected");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Languages => {
            for language in Language::ALL {
                println!("{}", language);
            }
            ExitCode::SUCCESS
        }
        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Toggle => session.toggle_theme()?,
                ThemeAction::Light => session.set_theme(Theme::Light)?,
                ThemeAction::Dark => session.set_theme(Theme::Dark)?,
            };
            println!("Theme: {}", theme.as_str());
            ExitCode::SUCCESS
        }
        Command::Logout => {
            let controller = build_controller(&config, event_bus.clone())?;
            session.logout(&controller).await?;
            println!("Logged out.");
            ExitCode::SUCCESS
        }
        command => {
            let client = AccountClient::new(&config.backend_url, config.request_timeout())?;
            let outcome = account_command(&client, &mut session, command).await;
            print_notices(&mut notices);
            match outcome {
                Ok(message) => {
                    println!("{}", message);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    };

    Ok(code)
}

fn build_controller(config: &ClientConfig, event_bus: EventBus) -> Result<CaptureWorkflowController> {
    let analyzer = AnalysisClient::new(&config.backend_url, config.request_timeout())?;
    let recommender = RecommendationClient::new(&config.backend_url, config.request_timeout())?;
    let mut controller = CaptureWorkflowController::new(
        Arc::new(analyzer),
        Arc::new(recommender),
        event_bus,
        config.language,
    );
    if let Some(path) = &config.camera_frame_path {
        controller = controller.with_camera(Box::new(FrameFileCamera::new(path)));
    }
    Ok(controller)
}

async fn analyze(
    controller: &CaptureWorkflowController,
    image: Option<PathBuf>,
    data_uri: Option<String>,
    camera: bool,
    select: Option<usize>,
) -> Result<WorkflowState, CaptureError> {
    let state = if camera {
        controller.switch_mode(InputMode::Camera).await;
        controller.start_camera().await?;
        controller.capture_from_camera().await?
    } else if let Some(uri) = data_uri {
        controller.switch_mode(InputMode::Upload).await;
        controller.submit_data_uri(&uri).await?
    } else if let Some(path) = image {
        controller.switch_mode(InputMode::Upload).await;
        let blob = FileBlob::read(&path)
            .await
            .map_err(|e| CaptureError::UnsupportedType(format!("{}: {}", path.display(), e)))?;
        controller.submit_file(blob).await?
    } else {
        controller.event_bus().notify(
            NoticeLevel::Error,
            "Choose an input: --image, --data-uri or --camera.",
        );
        return Err(CaptureError::UnsupportedType("no input given".to_string()));
    };

    // A rejected selection is reported as a notice; the pass result still prints
    let index = select.filter(|_| state.notice.is_none()).and_then(|n| n.checked_sub(1));
    if let Some(index) = index {
        if let Ok(selected) = controller.select_track_at(index).await {
            return Ok(selected);
        }
    }
    Ok(state)
}

async fn account_command(
    client: &AccountClient,
    session: &mut Session,
    command: Command,
) -> Result<String, AccountError> {
    match command {
        Command::Login { email, password } => {
            let user = session.login(client, &email, &password).await?;
            let shown = session.display_name().unwrap_or(user);
            Ok(format!("Welcome, {}!", shown))
        }
        Command::Register {
            firstname,
            lastname,
            email,
            password,
        } => {
            let request = RegisterRequest {
                firstname,
                lastname,
                email,
                password,
            };
            session.register(client, &request).await
        }
        Command::CheckUser { email } => Ok(if client.check_user(&email).await? {
            "Account exists.".to_string()
        } else {
            "No account found for that email.".to_string()
        }),
        Command::SendResetLink { email } => client.send_reset_link(&email).await,
        Command::ResetPassword {
            email,
            new_password,
            confirm,
        } => client.reset_password(&email, &new_password, &confirm).await,
        Command::Profile { action } => {
            let email = session.require_email()?.to_string();
            profile_command(client, &email, action.unwrap_or(ProfileAction::Show)).await
        }
        other => Err(AccountError::InvalidInput(format!(
            "unexpected command: {:?}",
            other
        ))),
    }
}

async fn profile_command(
    client: &AccountClient,
    email: &str,
    action: ProfileAction,
) -> Result<String, AccountError> {
    match action {
        ProfileAction::Show => {
            let profile = client.fetch_profile(email).await?;
            Ok(format!(
                "{} {} <{}>{}",
                profile.firstname,
                profile.lastname,
                profile.email,
                profile
                    .profile_pic
                    .map(|url| format!("\nAvatar: {}", url))
                    .unwrap_or_default()
            ))
        }
        ProfileAction::Update {
            firstname,
            lastname,
        } => {
            let mut profile = client.fetch_profile(email).await?;
            profile.firstname = firstname;
            profile.lastname = lastname;
            client.update_profile(&profile).await?;
            Ok("Profile updated!".to_string())
        }
        ProfileAction::Avatar { path } => {
            let blob = FileBlob::read(&path)
                .await
                .map_err(|e| AccountError::InvalidInput(format!("{}: {}", path.display(), e)))?;
            let image = ImageIngestAdapter::from_file(blob)?;
            let url = client.upload_profile_pic(email, &image).await?;
            Ok(format!("Profile picture updated: {}", url))
        }
        ProfileAction::Password {
            old_password,
            new_password,
        } => {
            let form = ChangePasswordForm {
                email: email.to_string(),
                old_password,
                new_password,
            };
            client.change_password(&form).await?;
            Ok("Password changed.".to_string())
        }
    }
}

/// Print queued notices; the workflow emits them in place of pop-ups
fn print_notices(rx: &mut broadcast::Receiver<ClientEvent>) {
    for (level, message) in drain_notices(rx) {
        match level {
            NoticeLevel::Error => eprintln!("⚠ {}", message),
            NoticeLevel::Info => eprintln!("{}", message),
        }
    }
}

/// Collect queued notifications, skipping over any lag gap
fn drain_notices(rx: &mut broadcast::Receiver<ClientEvent>) -> Vec<(NoticeLevel, String)> {
    let mut notices = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(ClientEvent::Notification { level, message, .. }) => notices.push((level, message)),
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "Notice receiver lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_notices_continues_after_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for i in 0..5 {
            bus.notify(NoticeLevel::Error, format!("notice {}", i));
        }

        let notices = drain_notices(&mut rx);

        let messages: Vec<&str> = notices.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(messages, vec!["notice 3", "notice 4"]);
    }

    #[test]
    fn test_drain_notices_ignores_other_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.emit_lossy(ClientEvent::CameraReleased {
            timestamp: chrono::Utc::now(),
        });
        bus.notify(NoticeLevel::Info, "Profile updated!");

        assert_eq!(
            drain_notices(&mut rx),
            vec![(NoticeLevel::Info, "Profile updated!".to_string())]
        );
    }
}
