mod assembler;
mod backend;
mod dispatcher;
mod dto;
#[cfg(any(test, feature = "test-util"))]
pub mod fake_player;
mod file_local_options;
mod formats;
mod mpv_ipc;
mod property;
mod reactor;
mod settings;
mod state_cache;
mod timeout_guard;
mod two_way_channel;
mod util;

pub mod remote_player {
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::broadcast;
    use tokio::task::JoinHandle;
    use tracing::warn;

    pub use crate::assembler::exclusion_set;
    use crate::assembler::SnapshotAssembler;
    pub use crate::backend::{PlayerBackend, PlayerError};
    pub use crate::dispatcher::{CommandDispatcher, DispatchError};
    pub use crate::dto::announcement::Announcement;
    pub use crate::dto::chapter::Chapter;
    pub use crate::dto::command::{LoadRequest, SeekFlag, SeekRequest, TrackAddRequest};
    pub use crate::dto::player_event::PlayerEvent;
    pub use crate::dto::player_info::PlayerVersions;
    pub use crate::dto::playlist_item::PlaylistItem;
    pub use crate::dto::snapshot::{PlayerSnapshot, SnapshotField};
    pub use crate::dto::track::{Track, TrackDetails, TrackType};
    pub use crate::file_local_options::{
        FileLocalOptionsError, FileLocalOptionsMap, FileLocalOptionsStore,
    };
    pub use crate::formats::{FileType, detect_file_type};
    pub use crate::mpv_ipc::MpvIpcClient;
    use crate::property::PropertyAccessor;
    use crate::reactor::{EventReactor, OsdDisplay};
    pub use crate::settings::{DEFAULT_STATUS_TIMEOUT, Settings, default_file_local_options_path};
    use crate::state_cache::StateCache;
    use crate::timeout_guard::run_with_deadline;
    pub use crate::util::{format_time, is_url};

    /// Everything the server needs to query and control one player.
    #[derive(Clone)]
    pub struct RemotePlayer {
        backend: Arc<dyn PlayerBackend>,
        assembler: SnapshotAssembler,
        cache: Arc<StateCache>,
        commands: CommandDispatcher,
        options: FileLocalOptionsStore,
        osd: OsdDisplay,
        settings: Settings,
        announcement_tx: broadcast::Sender<Announcement>,
    }

    impl RemotePlayer {
        pub fn new(backend: Arc<dyn PlayerBackend>, settings: Settings) -> Self {
            let (announcement_tx, _) = broadcast::channel(32);
            let options = FileLocalOptionsStore::new(&settings.file_local_options_path);

            Self {
                assembler: SnapshotAssembler::new(PropertyAccessor::new(backend.clone())),
                cache: Arc::new(StateCache::new()),
                commands: CommandDispatcher::new(backend.clone(), options.clone()),
                osd: OsdDisplay::new(backend.clone(), settings.osd_messages),
                options,
                backend,
                settings,
                announcement_tx,
            }
        }

        /// Connects to mpv's IPC socket or named pipe.
        pub async fn connect(
            socket: impl Into<PathBuf>,
            settings: Settings,
        ) -> Result<Self, PlayerError> {
            let client = MpvIpcClient::connect(socket).await?;
            Ok(Self::new(Arc::new(client), settings))
        }

        pub fn subscribe(&self) -> broadcast::Receiver<Announcement> {
            self.announcement_tx.subscribe()
        }

        /// Starts reacting to player events until the player goes away.
        pub fn spawn_reactor(&self) -> JoinHandle<()> {
            let reactor = EventReactor::new(
                self.backend.clone(),
                self.assembler.clone(),
                self.osd.clone(),
                self.announcement_tx.clone(),
            );
            tokio::spawn(reactor.run(self.backend.subscribe()))
        }

        /// Current player state without the `exclude`d fields.
        ///
        /// Reading every property can stall while the player is busy (opening a network
        /// stream, for instance). If that takes longer than the configured status timeout
        /// the last state that was read successfully is returned instead.
        pub async fn get_status(&self, exclude: HashSet<SnapshotField>) -> PlayerSnapshot {
            let assembler = self.assembler.clone();
            let status = run_with_deadline(
                "status",
                async move { assembler.assemble(&exclude).await },
                self.settings.status_timeout,
            )
            .await;

            match status {
                Ok(snapshot) => {
                    self.cache.update(&snapshot).await;
                    snapshot
                }
                Err(e) => {
                    warn!("{e}, returning cached status");
                    self.cache.get().await
                }
            }
        }

        pub async fn get_playlist(&self) -> Vec<PlaylistItem> {
            self.assembler.playlist().await
        }

        pub async fn get_tracks(&self) -> Vec<Track> {
            self.assembler.tracks().await
        }

        pub async fn get_versions(&self) -> PlayerVersions {
            self.assembler.versions().await
        }

        /// Puts `text` on the player's OSD whether or not event messages are enabled.
        pub async fn show_message(&self, text: &str, duration: Option<Duration>) {
            self.osd.show_text(text, duration).await;
        }

        pub fn commands(&self) -> &CommandDispatcher {
            &self.commands
        }

        pub fn file_local_options(&self) -> &FileLocalOptionsStore {
            &self.options
        }

        pub fn settings(&self) -> &Settings {
            &self.settings
        }
    }
}
