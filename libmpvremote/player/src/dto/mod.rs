pub(crate) mod announcement;
pub(crate) mod chapter;
pub(crate) mod command;
pub(crate) mod player_event;
pub(crate) mod player_info;
pub(crate) mod playlist_item;
pub(crate) mod snapshot;
pub(crate) mod track;
