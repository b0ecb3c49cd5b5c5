use std::path::Path;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub index: i64,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    // Kept lowercase to match what clients already consume
    #[serde(rename = "filename", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PlaylistItem {
    pub fn new(
        index: i64,
        id: i64,
        file_path: Option<String>,
        current: bool,
        title: Option<String>,
    ) -> Self {
        let file_name = file_path.as_deref().and_then(|path| {
            Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        });

        Self {
            index,
            id,
            file_path,
            file_name,
            current,
            title,
        }
    }
}
