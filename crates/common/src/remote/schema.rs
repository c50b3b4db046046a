use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Listing {
    pub value: Vec<DriveItem>,
    /// Present while more pages remain
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// One entry of a listing page.
///
/// Only the fields the mirror needs are decoded; absent optional fields stay
///  `None` rather than defaulting to something that looks valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub last_modified_date_time: DateTime<Utc>,
    /// Only folders carry the folder facet
    #[serde(default)]
    pub folder: Option<FolderFacet>,
    /// Pre-authenticated, short-lived download link; files only
    #[serde(rename = "@microsoft.graph.downloadUrl", default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: Option<u64>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}
