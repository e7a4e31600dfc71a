mod api;
mod app;
mod config;
mod error;
mod logging;
mod session;
mod state;
mod ui;

use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::session::{FileStorage, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    info!(api = %config.api_url, data_dir = %config.data_dir.display(), "starting fitlog");

    let session = SessionStore::open(FileStorage::new(&config.data_dir));
    let api = Arc::new(ApiClient::new(&config.api_url)?);

    let mut terminal = ratatui::init();
    let mut app = App::new(api, session, config.sync_interval);
    let result = app.run(&mut terminal);
    ratatui::restore();

    result?;
    info!("exiting");
    Ok(())
}
