use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use eyre::{Context, Result, eyre};
use get_if_addrs::get_if_addrs;
use libmpvremote_management::database::Database;
use libmpvremote_player::remote_player::RemotePlayer;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::host::HostControl;
use crate::services::{
    collections, computer, controls, events, file_browser, info, playlist, status, tracks,
};
use crate::settings::ServerSettings;

const ADDRESS_MESSAGE_DURATION: Duration = Duration::from_secs(5);

pub fn router(context: AppContext) -> Router {
    let api = Router::new()
        .merge(status::routes())
        .merge(controls::routes())
        .merge(tracks::routes())
        .merge(playlist::routes())
        .merge(info::routes())
        .merge(computer::routes())
        .merge(events::routes())
        .merge(file_browser::routes())
        .merge(collections::routes());

    Router::new()
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .with_state(context)
}

pub async fn run(settings: ServerSettings, host: Arc<dyn HostControl>) -> Result<()> {
    info!("Connecting to mpv at {:?}", settings.socket);
    let player = RemotePlayer::connect(&settings.socket, settings.player_settings())
        .await
        .wrap_err_with(|| format!("Error connecting to mpv at {:?}", settings.socket))?;
    player
        .file_local_options()
        .ensure_exists()
        .await
        .wrap_err("Error creating file local options file")?;

    let database = init_database(&settings).await?;
    let reactor = player.spawn_reactor();

    let listener = bind(&settings).await?;
    let port = listener.local_addr()?.port();
    let message = format!("Remote access on: {}:{port}", remote_address(settings.address));
    info!("{message}");
    player
        .show_message(&message, Some(ADDRESS_MESSAGE_DURATION))
        .await;

    let context = AppContext::new(player, database.clone(), host, settings);
    axum::serve(listener, router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Error running server")?;

    info!("Shutting down");
    reactor.abort();
    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn init_database(settings: &ServerSettings) -> Result<Option<Database>> {
    if !settings.use_local_db {
        return Ok(None);
    }
    let path = settings
        .database_path()
        .ok_or_else(|| eyre!("Unable to locate the mpv config directory for the database"))?;
    let database = Database::connect(&path, true).await?;
    database
        .migrate()
        .await
        .wrap_err("Error migrating database")?;
    Ok(Some(database))
}

/// Binds the first free port in the configured range.
pub async fn bind(settings: &ServerSettings) -> Result<TcpListener> {
    for port in settings.ports() {
        let addr = SocketAddr::new(settings.address, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                info!("Listening on {addr}");
                return Ok(listener);
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                warn!("Port {port} is in use, trying the next one");
            }
            Err(e) => return Err(e).wrap_err_with(|| format!("Error binding {addr}")),
        }
    }
    Err(eyre!(
        "No free port between {} and {}",
        settings.port,
        settings.port_range_end
    ))
}

/// Address clients on the network should use. A wildcard bind is reported as the first
/// non-loopback IPv4 address of the machine.
pub fn remote_address(bind_address: IpAddr) -> IpAddr {
    if !bind_address.is_unspecified() {
        return bind_address;
    }
    get_if_addrs()
        .map_err(|e| warn!("Error listing network interfaces: {e}"))
        .ok()
        .and_then(|interfaces| {
            interfaces
                .into_iter()
                .map(|iface| iface.ip())
                .find(|ip| ip.is_ipv4() && !ip.is_loopback())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Error listening for shutdown signal: {e}");
        futures::future::pending::<()>().await;
    }
}
