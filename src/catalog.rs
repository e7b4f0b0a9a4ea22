//!
//! src/catalog.rs
//!
//! Turns lookup results into release records: filtering, date
//! normalization, per-artist collection, dedup and ordering
//!

use std::collections::HashSet;

use chrono::DateTime;
use tracing::{debug, warn};

use crate::fetch::{LookupItem, ReleaseSource};
use crate::types::Release;

pub const RELEASE_KIND: &str = "track";

/// Truncate an RFC 3339 timestamp to its date. On parse failure keep the
/// first 10 characters of whatever came back, or nothing at all.
pub fn iso_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.date_naive().to_string(),
        Err(_) => raw.chars().take(10).collect(),
    }
}

/// Map one lookup entry to a release record; None for anything that is
/// not an individual song.
pub fn release_from_item(item: &LookupItem, artist_id: &str) -> Option<Release> {
    if !item.is_song() {
        return None;
    }
    let track_id = item.track_id.map(|id| id.to_string()).unwrap_or_default();
    Some(Release {
        id: format!("apple-track-{track_id}"),
        title: item.track_name.clone(),
        release_date: iso_date(&item.release_date),
        kind: RELEASE_KIND.to_string(),
        source: format!("Apple Music (artist {artist_id})"),
        url: item.track_view_url.clone(),
    })
}

/// Fetch every artist identifier in order. A failed identifier logs a
/// warning and contributes nothing; the rest still go through.
pub fn collect_releases(
    source: &dyn ReleaseSource,
    artist_ids: &[String],
) -> Vec<Release> {
    let mut releases = Vec::new();
    for artist_id in artist_ids {
        match source.artist_songs(artist_id) {
            Ok(items) => {
                let before = releases.len();
                releases.extend(
                    items.iter().filter_map(|i| release_from_item(i, artist_id))
                );
                debug!(
                    artist = %artist_id,
                    songs = releases.len() - before,
                    "lookup.done"
                );
            }
            Err(e) => {
                warn!(artist = %artist_id, error = %e, "lookup.failed");
            }
        }
    }
    releases
}

/// Both key kinds share one seen-set; a record is dropped when either of
/// its keys was already claimed by an earlier record.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DedupKey {
    TitleDate(String, String),
    Url(String),
}

fn title_date_key(r: &Release) -> DedupKey {
    DedupKey::TitleDate(
        r.title.trim().to_lowercase(),
        r.release_date.trim().to_string(),
    )
}

fn url_key(r: &Release) -> Option<DedupKey> {
    let url = r.url.trim();
    if url.is_empty() {
        None
    } else {
        Some(DedupKey::Url(url.to_string()))
    }
}

fn sort_date(r: &Release) -> &str {
    if r.release_date.is_empty() { "0000-00-00" } else { &r.release_date }
}

/// First-seen wins, then newest first. Blank dates sink to the bottom.
pub fn dedupe_releases(releases: Vec<Release>) -> Vec<Release> {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    let mut out: Vec<Release> = Vec::new();

    for r in releases {
        let key = title_date_key(&r);
        let key2 = url_key(&r);
        if seen.contains(&key) || key2.as_ref().is_some_and(|k| seen.contains(k)) {
            continue;
        }
        seen.insert(key);
        if let Some(k) = key2 {
            seen.insert(k);
        }
        out.push(r);
    }

    // lexicographic works for fixed YYYY-MM-DD strings; stable sort keeps
    // the surviving input order for equal dates
    out.sort_by(|a, b| sort_date(b).cmp(sort_date(a)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CatalogError;

    fn song(title: &str, date: &str, url: &str, id: u64) -> LookupItem {
        LookupItem {
            wrapper_type: "track".to_string(),
            kind: "song".to_string(),
            track_id: Some(id),
            track_name: title.to_string(),
            release_date: date.to_string(),
            track_view_url: url.to_string(),
        }
    }

    fn release(title: &str, date: &str, url: &str) -> Release {
        Release {
            id: format!("apple-track-{title}"),
            title: title.to_string(),
            release_date: date.to_string(),
            kind: RELEASE_KIND.to_string(),
            source: "Apple Music (artist test)".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn iso_date_truncates_timestamps() {
        assert_eq!(iso_date("2024-03-01T08:00:00Z"), "2024-03-01");
        assert_eq!(iso_date("2024-03-01T23:59:59+00:00"), "2024-03-01");
    }

    #[test]
    fn iso_date_falls_back_to_prefix() {
        assert_eq!(iso_date("2024-03-01 oddly formatted"), "2024-03-01");
        assert_eq!(iso_date("2024-03-01"), "2024-03-01");
        assert_eq!(iso_date("junk"), "junk");
        assert_eq!(iso_date(""), "");
    }

    #[test]
    fn only_songs_become_releases() {
        let album = LookupItem {
            wrapper_type: "collection".to_string(),
            ..LookupItem::default()
        };
        assert!(release_from_item(&album, "1").is_none());

        let item = song("Song", "2024-01-05T08:00:00Z", "https://x.example/1", 42);
        let release = release_from_item(&item, "1").unwrap();
        assert_eq!(release.id, "apple-track-42");
        assert_eq!(release.title, "Song");
        assert_eq!(release.release_date, "2024-01-05");
        assert_eq!(release.kind, "track");
        assert_eq!(release.source, "Apple Music (artist 1)");
        assert_eq!(release.url, "https://x.example/1");
    }

    #[test]
    fn same_title_and_date_collapse_first_seen_wins() {
        let input = vec![
            release("Song", "2024-01-01", "https://x.example/a"),
            release("Song", "2024-01-01", "https://x.example/b"),
        ];
        let out = dedupe_releases(input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://x.example/a");
    }

    #[test]
    fn title_comparison_ignores_case_and_padding() {
        let input = vec![
            release("Song", "2024-01-01", ""),
            release("  SONG ", "2024-01-01", ""),
        ];
        assert_eq!(dedupe_releases(input).len(), 1);
    }

    #[test]
    fn repeated_url_collapses_even_with_new_title() {
        let input = vec![
            release("Song", "2024-01-01", "https://x.example/a"),
            release("Song (Remaster)", "2024-06-01", "https://x.example/a"),
        ];
        let out = dedupe_releases(input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Song");
    }

    #[test]
    fn empty_urls_never_collide() {
        let input = vec![
            release("One", "2024-01-01", ""),
            release("Two", "2024-01-02", ""),
        ];
        assert_eq!(dedupe_releases(input).len(), 2);
    }

    #[test]
    fn dedupe_is_idempotent_and_never_grows() {
        let input = vec![
            release("One", "2024-01-01", "https://x.example/1"),
            release("Two", "", "https://x.example/2"),
            release("one", "2024-01-01", "https://x.example/3"),
            release("Three", "2023-05-05", ""),
        ];
        let len_in = input.len();
        let once = dedupe_releases(input);
        assert!(once.len() <= len_in);
        let twice = dedupe_releases(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn sorted_newest_first_with_blank_dates_last() {
        let input = vec![
            release("Old", "2020-02-02", ""),
            release("Dateless", "", ""),
            release("New", "2025-12-31", ""),
            release("Mid", "2023-07-07", ""),
        ];
        let titles: Vec<String> = dedupe_releases(input)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["New", "Mid", "Old", "Dateless"]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let input = vec![
            release("A", "2024-01-01", "https://x.example/a"),
            release("B", "2024-01-01", "https://x.example/b"),
            release("C", "2024-01-01", "https://x.example/c"),
        ];
        let titles: Vec<String> = dedupe_releases(input)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    struct StubSource;

    impl ReleaseSource for StubSource {
        fn artist_songs(&self, artist_id: &str) ->
            Result<Vec<LookupItem>, CatalogError> {
            match artist_id {
                "down" => Err(CatalogError::Http("connection refused".to_string())),
                "up" => Ok(vec![
                    song("One", "2024-01-01T08:00:00Z", "https://x.example/1", 1),
                    song("Two", "2024-02-01T08:00:00Z", "https://x.example/2", 2),
                    song("Three", "2024-03-01T08:00:00Z", "https://x.example/3", 3),
                ]),
                _ => Ok(Vec::new()),
            }
        }
    }

    #[test]
    fn failed_artist_is_isolated_from_the_rest() {
        let ids = vec!["down".to_string(), "up".to_string()];
        let releases = collect_releases(&StubSource, &ids);
        assert_eq!(releases.len(), 3);
        assert!(releases.iter().all(|r| r.source.contains("artist up")));
    }

    #[test]
    fn fetch_order_is_preserved_across_artists() {
        let ids = vec!["up".to_string(), "down".to_string()];
        let titles: Vec<String> = collect_releases(&StubSource, &ids)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }
}
