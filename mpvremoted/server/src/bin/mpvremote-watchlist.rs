use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, eyre};
use libmpvremote_management::database::Database;
use libmpvremote_management::paths::default_database_path;
use mpvremoted::init_tracing;
use tracing::info;

/// Records how far a file was watched. Run by mpv's unload hook.
#[derive(Debug, Parser)]
#[command(name = "mpvremote-watchlist", version)]
struct Args {
    /// File that was playing
    path: PathBuf,
    /// Playback time in seconds
    time: f64,
    /// Position as a percentage of the file's duration
    percent: f64,
    #[arg(long, env = "MPVREMOTE_DATABASE")]
    database_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");
    let args = Args::parse();

    let db_path = args
        .database_path
        .or_else(default_database_path)
        .ok_or_else(|| eyre!("Unable to locate the mpv config directory for the database"))?;
    let database = Database::connect(&db_path, true).await?;
    database
        .migrate()
        .await
        .wrap_err("Error migrating database")?;

    match database
        .add_media_status_entry(&args.path, args.time, args.percent)
        .await?
    {
        Some(status) => info!("Saved media status {status:?}"),
        None => info!("{:?} was barely watched, nothing saved", args.path),
    }
    database.close().await;
    Ok(())
}
