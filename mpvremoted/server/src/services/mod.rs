pub(crate) mod collections;
pub(crate) mod computer;
pub(crate) mod controls;
pub(crate) mod events;
pub(crate) mod file_browser;
pub(crate) mod info;
pub(crate) mod playlist;
pub(crate) mod status;
pub(crate) mod tracks;
