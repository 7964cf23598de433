use crate::config::Config;
use crate::error::Result;
use crate::sheets::{GoogleClient, clear_google_tokens};
use tracing::info;

pub(super) async fn execute(reset: bool) -> Result<()> {
    if reset {
        clear_google_tokens()?;
    }

    let config = Config::load()?;
    let _client = GoogleClient::new(&config.google).await?;

    info!("Google authentication verified");

    Ok(())
}
