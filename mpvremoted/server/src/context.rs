use std::sync::Arc;

use libmpvremote_management::database::Database;
use libmpvremote_management::file_browser::FileBrowser;
use libmpvremote_player::remote_player::RemotePlayer;

use crate::api_error::ApiError;
use crate::host::HostControl;
use crate::settings::ServerSettings;

/// Shared by every request handler. Built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub player: RemotePlayer,
    pub database: Option<Database>,
    pub file_browser: FileBrowser,
    pub host: Arc<dyn HostControl>,
    pub settings: Arc<ServerSettings>,
}

impl AppContext {
    pub fn new(
        player: RemotePlayer,
        database: Option<Database>,
        host: Arc<dyn HostControl>,
        settings: ServerSettings,
    ) -> Self {
        let file_browser = FileBrowser::new(
            settings.filebrowser_paths.clone(),
            settings.unsafe_filebrowsing,
            database.clone(),
        );
        Self {
            player,
            database,
            file_browser,
            host,
            settings: Arc::new(settings),
        }
    }

    pub fn database(&self) -> Result<&Database, ApiError> {
        self.database
            .as_ref()
            .ok_or_else(|| ApiError::BadRequest("mpvremote-uselocaldb disabled".to_owned()))
    }
}
