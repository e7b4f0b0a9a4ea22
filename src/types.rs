use serde::{Deserialize, Serialize};

/// Track backed by a file in the audio directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTrack {
    pub title: String,
    pub release: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub note: String,
}

/// Track row for the discovery page, release date from the optional map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryTrack {
    pub title: String,
    pub release: String,
    pub url: String,
    pub artwork: String,
}

/// Release pulled from the remote catalog, camelCase on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: String,
    pub title: String,
    pub release_date: String,
    pub kind: String,
    pub source: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalTracksPayload {
    pub generated_at: String,
    pub count: usize,
    pub tracks: Vec<LocalTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoveryPayload {
    pub generated_at: String,
    pub tracks: Vec<DiscoveryTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasesPayload {
    pub generated_at: String,
    pub artist_ids: Vec<String>,
    pub releases: Vec<Release>,
}
