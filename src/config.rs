use url::Url;
use std::path::PathBuf;
use std::time;
use crate::CatalogError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 20_000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 5_000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Constants for the lookup endpoint
pub const LOOKUP_ENTITY: &str = "song";
pub const LOOKUP_LIMIT: u32 = 200;
pub const DEFAULT_ARTIST_IDS: [&str; 2] = ["1832538332", "1831765259"];

/// Constants for local scanning and cover extraction
pub const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "mp3", "m4a", "flac", "ogg", "aac"];
pub const MIN_COVER_BYTES: u64 = 2048;

/// Wrapper over env::var that falls back to a default when unset or blank
fn env_or(s: &str, default: &str) -> String {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

fn parse_artist_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

///
/// Configuration for input and output locations, all rooted at the
/// site directory the front-end serves from
///
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub audio_dir: PathBuf,
    pub covers_dir: PathBuf,
    pub local_tracks: PathBuf,
    pub apple_catalog: PathBuf,
    pub discovery_catalog: PathBuf,
    pub release_dates: PathBuf,
    pub fallback_cover: String,
}

fn build_paths() -> PathsConfig {
    let root = PathBuf::from(env_or("CATALOG_ROOT", "."));
    PathsConfig {
        audio_dir: root.join("audio"),
        covers_dir: root.join("img").join("covers"),
        local_tracks: root.join("data").join("local_tracks.json"),
        apple_catalog: root.join("data").join("apple_catalog.json"),
        discovery_catalog: root.join("data").join("discovery_catalog.json"),
        release_dates: root.join("data").join("release_dates.json"),
        fallback_cover: env_or("CATALOG_FALLBACK_COVER", "img/default-cover.png"),
    }
}

///
/// Configuration for the iTunes lookup endpoint
///
#[derive(Debug, Clone)]
pub struct ItunesConfig {
    pub lookup_url: Url,
    pub entity: String,
    pub limit: u32,
    pub artist_ids: Vec<String>,
}

fn build_itunes() -> Result<ItunesConfig, CatalogError> {
    let lookup_url = env_or("ITUNES_LOOKUP_URL", "https://itunes.apple.com/lookup");
    let lookup_url = Url::parse(&lookup_url)
        .map_err(|e| CatalogError::Config(
            format!("ITUNES_LOOKUP_URL invalid {e}")
        ))?;

    // https and hostname check
    ensure_https(&lookup_url)
        .map_err(CatalogError::Config)?;
    ensure_host(&lookup_url, "itunes.apple.com")
        .map_err(CatalogError::Config)?;

    let artist_ids = parse_artist_ids(
        &env_or("CATALOG_ARTIST_IDS", &DEFAULT_ARTIST_IDS.join(","))
    );
    if artist_ids.is_empty() {
        return Err(CatalogError::Config("CATALOG_ARTIST_IDS was empty".to_string()));
    }

    Ok( ItunesConfig {
        lookup_url,
        entity: LOOKUP_ENTITY.to_string(),
        limit: LOOKUP_LIMIT,
        artist_ids,
    })
}

///
/// Configuration for Http timeouts, redirects, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Configuration for the external cover-art tool
///
#[derive(Debug, Clone)]
pub struct CoverConfig {
    pub ffmpeg_bin: String,
    pub min_bytes: u64,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            min_bytes: MIN_COVER_BYTES,
        }
    }
}

fn build_covers() -> CoverConfig {
    CoverConfig {
        ffmpeg_bin: env_or("FFMPEG_BIN", "ffmpeg"),
        ..CoverConfig::default()
    }
}

///
/// Configuration for Logger
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,catalog_sync=debug,reqwest=warn".to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
        }
    }
}

fn build_logging() -> LoggingConfig {
    let format = match env_or("CATALOG_LOG_FORMAT", "pretty").as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    LoggingConfig { format, ..LoggingConfig::default() }
}

///
/// AppConfig which holds everything the binaries need
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub itunes: ItunesConfig,
    pub http: HttpConfig,
    pub covers: CoverConfig,
    pub logging: LoggingConfig,
    pub audio_exts: Vec<String>,
}

///
/// Resolve all environment variables to a config at program start.
///
pub fn load_config() -> Result<AppConfig, CatalogError> {
    dotenvy::dotenv().ok();

    let paths   = build_paths();
    let itunes  = build_itunes()?;
    let http    = HttpConfig::default();
    let covers  = build_covers();
    let logging = build_logging();
    let audio_exts = AUDIO_EXTENSIONS.iter().map(|s| s.to_string()).collect();

    Ok( AppConfig { paths, itunes, http, covers, logging, audio_exts } )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_ids_split_and_trimmed() {
        let ids = parse_artist_ids(" 123, 456 ,,789");
        assert_eq!(ids, vec!["123", "456", "789"]);
    }

    #[test]
    fn lookup_url_must_be_https_on_expected_host() {
        let ok = Url::parse("https://itunes.apple.com/lookup").unwrap();
        assert!(ensure_https(&ok).is_ok());
        assert!(ensure_host(&ok, "itunes.apple.com").is_ok());

        let wrong_scheme = Url::parse("http://itunes.apple.com/lookup").unwrap();
        assert!(ensure_https(&wrong_scheme).is_err());

        let wrong_host = Url::parse("https://example.com/lookup").unwrap();
        assert!(ensure_host(&wrong_host, "itunes.apple.com").is_err());
    }
}
