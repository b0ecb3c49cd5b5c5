use std::sync::Arc;

use clap::Parser;
use mpvremoted::host::SystemHost;
use mpvremoted::settings::ServerSettings;
use mpvremoted::{init_tracing, server};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    let settings = ServerSettings::parse();
    init_tracing(settings.log_filter());

    server::run(settings, Arc::new(SystemHost)).await
}
