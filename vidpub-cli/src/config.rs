//! CLI configuration and shared wiring

use anyhow::Result;
use core_auth::{AuthManager, OAuthConfig, OAuthFlow, TokenFileStore};
use core_manifest::MetadataOptions;
use provider_drive::{DriveClient, DriveConfig};
use provider_youtube::YouTubeClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Port of the one-shot OAuth callback listener
pub const REDIRECT_PORT: u16 = 3000;

pub struct Config {
    pub data_dir: PathBuf,
    pub client_id: String,
    pub client_secret: String,
    pub shared_drive_id: String,
    pub description_footer: Option<String>,
    pub base_tags: Vec<String>,
}

impl Config {
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("upload-state.json")
    }

    pub fn tokens_path(&self) -> PathBuf {
        self.data_dir.join("tokens.json")
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("upload-report.json")
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/oauth2callback", REDIRECT_PORT)
    }

    pub fn oauth_flow(&self, http: reqwest::Client) -> OAuthFlow {
        OAuthFlow::new(
            OAuthConfig::google(
                self.client_id.clone(),
                self.client_secret.clone(),
                self.redirect_uri(),
            ),
            http,
        )
    }

    pub fn metadata_options(&self) -> MetadataOptions {
        MetadataOptions {
            footer: self.description_footer.clone(),
            base_tags: self.base_tags.clone(),
            ..Default::default()
        }
    }
}

/// Authenticated remote clients, constructed once per command
pub struct Clients {
    pub youtube: Arc<YouTubeClient>,
    pub drive: Arc<DriveClient>,
}

pub async fn build_clients(config: &Config) -> Result<Clients> {
    let http = reqwest::Client::new();
    let auth = Arc::new(
        AuthManager::load(
            config.oauth_flow(http.clone()),
            TokenFileStore::new(config.tokens_path()),
        )
        .await?,
    );

    if !auth.is_authenticated().await {
        anyhow::bail!("No tokens found. Run \"vidpub auth\" first to authenticate.");
    }

    let drive = Arc::new(DriveClient::new(
        http.clone(),
        Arc::clone(&auth),
        DriveConfig {
            shared_drive_id: config.shared_drive_id.clone(),
        },
    ));
    let youtube = Arc::new(YouTubeClient::new(http, auth));

    Ok(Clients { youtube, drive })
}
