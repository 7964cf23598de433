use crate::config::{Config, GoogleConfig};
use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use hyper_util::client::legacy::connect::HttpConnector;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing::instrument;
use yup_oauth2::{
    ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
    authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_CERT_URL: &str = "https://www.googleapis.com/oauth2/v1/certs";
pub(crate) const GOOGLE_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// Build an authenticator and fetch a token up front, so the interactive
/// consent flow, if one is needed, runs before any document call.
///
/// The first run prints a consent URL and blocks until the operator pastes
/// the authorization code; the exchanged token is persisted to the cache
/// path and reused on later runs.
pub(super) async fn obtain_authenticator(config: &GoogleConfig) -> Result<AuthType> {
    let secret = application_secret(config);
    let cache_path = token_cache_path()?;

    if let Some(parent) = cache_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Auth(format!("Failed to create token cache directory: {}", e)))?;
    }

    // Installed flow in interactive mode: the operator copies the
    // authorization code from the browser into the terminal.
    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::Interactive)
        .persist_tokens_to_disk(cache_path)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(auth)
}

fn application_secret(config: &GoogleConfig) -> ApplicationSecret {
    ApplicationSecret {
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
        auth_uri: GOOGLE_AUTH_URL.to_string(),
        token_uri: GOOGLE_TOKEN_URL.to_string(),
        auth_provider_x509_cert_url: Some(GOOGLE_CERT_URL.to_string()),
        redirect_uris: vec![GOOGLE_REDIRECT_URI.to_string()],
        project_id: None,
        client_email: None,
        client_x509_cert_url: None,
    }
}

/// Clear cached Google tokens by deleting the token cache file
#[instrument(name = "Clearing Google auth tokens", skip_all)]
pub fn clear_tokens() -> Result<()> {
    let token_path = token_cache_path()?;

    if !token_path.exists() {
        debug!("No Google tokens to clear");
        return Ok(());
    }

    fs::remove_file(&token_path)
        .map_err(|e| AppError::Auth(format!("Failed to delete tokens file: {}", e)))?;
    debug!("Cleared cached Google tokens");

    Ok(())
}

pub(crate) fn token_cache_path() -> Result<PathBuf> {
    Config::cache_file("google_tokens.json")
}
