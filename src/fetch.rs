//!
//! src/fetch.rs
//!
//! Defines the client for the iTunes lookup endpoint and the
//! structured records it returns
//!

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{header, redirect};
use serde::Deserialize;

use crate::config::{HttpConfig, ItunesConfig};
use crate::CatalogError;

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")
);

/// Client building functionality
pub fn base_client(http: &HttpConfig) -> Result<Client, CatalogError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
        .default_headers(h)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CatalogError::Http(format!("build client: {e}")))
}

/// One entry of the lookup response's heterogeneous `results` array.
/// Artists and collections come back alongside songs; missing fields
/// default so filtering can happen after parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupItem {
    pub wrapper_type: String,
    pub kind: String,
    pub track_id: Option<u64>,
    pub track_name: String,
    pub release_date: String,
    pub track_view_url: String,
}

impl LookupItem {
    /// Individual tracks only; albums, collections and artist rows are
    /// discarded upstream of mapping.
    pub fn is_song(&self) -> bool {
        self.wrapper_type == "track" && self.kind == "song"
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub results: Vec<LookupItem>,
}

/// Transport seam: mapping and dedup run against this, not against HTTP.
pub trait ReleaseSource {
    fn artist_songs(&self, artist_id: &str) -> Result<Vec<LookupItem>, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct ItunesClient {
    pub http: Client,
    pub cfg: ItunesConfig,
}

impl ItunesClient {
    pub fn new(http_config: &HttpConfig, cfg: &ItunesConfig) ->
        Result<Self, CatalogError> {

        let http = base_client(http_config)?;
        Ok( Self {
            http,
            cfg: cfg.clone(),
        })
    }

    /// GET /lookup?id={artist}&entity=song&limit=200
    pub fn lookup(&self, artist_id: &str) -> RequestBuilder {
        self.http.get(self.cfg.lookup_url.clone()).query(&[
            ("id", artist_id),
            ("entity", &self.cfg.entity),
            ("limit", &self.cfg.limit.to_string()),
        ])
    }
}

impl ReleaseSource for ItunesClient {
    fn artist_songs(&self, artist_id: &str) -> Result<Vec<LookupItem>, CatalogError> {
        let response = self.lookup(artist_id)
            .send()?
            .error_for_status()?;
        let parsed: LookupResponse = response.json()?;
        Ok(parsed.results)
    }
}
