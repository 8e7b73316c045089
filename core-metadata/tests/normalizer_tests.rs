//! Integration tests for metadata normalization
//!
//! Covers each dialect pass plus mixed batches where several dialects
//! appear at once.

use bridge_traits::{MetadataDialect, MetadataEntry, UnifiedMetadata};
use bytes::Bytes;
use core_metadata::normalize;

fn id3_text(id: &str, value: &str) -> MetadataEntry {
    MetadataEntry::Id3Text {
        id: id.to_string(),
        value: value.to_string(),
    }
}

fn vorbis(key: &str, value: &str) -> MetadataEntry {
    MetadataEntry::VorbisComment {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn mdta(key: &str, value: &'static [u8]) -> MetadataEntry {
    MetadataEntry::Mdta {
        key: key.to_string(),
        value: Bytes::from_static(value),
    }
}

fn icy_info(title: Option<&str>) -> MetadataEntry {
    MetadataEntry::IcyInfo {
        title: title.map(str::to_string),
        url: None,
    }
}

// ============================================================================
// ID3
// ============================================================================

#[test]
fn test_id3_title_and_artist() {
    let records = normalize(&[id3_text("TIT2", "Song"), id3_text("TPE1", "Band")]);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.dialect, MetadataDialect::Id3);
    assert_eq!(record.title.as_deref(), Some("Song"));
    assert_eq!(record.artist.as_deref(), Some("Band"));
    assert!(record.url.is_none());
    assert!(record.album.is_none());
    assert!(record.date.is_none());
    assert!(record.genre.is_none());
}

#[test]
fn test_id3_legacy_and_lowercase_ids() {
    let records = normalize(&[
        id3_text("tt2", "Legacy Title"),
        id3_text("TAL", "Legacy Album"),
        id3_text("TOR", "1999"),
        id3_text("tco", "Electronic"),
    ]);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.title.as_deref(), Some("Legacy Title"));
    assert_eq!(record.album.as_deref(), Some("Legacy Album"));
    assert_eq!(record.date.as_deref(), Some("1999"));
    assert_eq!(record.genre.as_deref(), Some("Electronic"));
}

#[test]
fn test_id3_url_frames() {
    let records = normalize(&[MetadataEntry::Id3Url {
        id: "WOAR".to_string(),
        url: "https://artist.example.com".to_string(),
    }]);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url.as_deref(), Some("https://artist.example.com"));
}

#[test]
fn test_empty_batch_yields_nothing() {
    assert!(normalize(&[]).is_empty());
}

#[test]
fn test_unrecognized_entries_yield_nothing() {
    let records = normalize(&[
        id3_text("TXXX", "custom"),
        id3_text("COMM", "comment"),
        vorbis("COMMENT", "nice"),
        mdta("com.apple.quicktime.make", b"Apple"),
    ]);

    assert!(records.is_empty());
}

// ============================================================================
// ICY
// ============================================================================

#[test]
fn test_icy_title_split() {
    let records = normalize(&[icy_info(Some("Daft Punk - One More Time"))]);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.dialect, MetadataDialect::Icy);
    assert_eq!(record.artist.as_deref(), Some("Daft Punk"));
    assert_eq!(record.title.as_deref(), Some("One More Time"));
}

#[test]
fn test_icy_title_without_separator() {
    let records = normalize(&[icy_info(Some("Live from the studio"))]);

    assert_eq!(records.len(), 1);
    assert!(records[0].artist.is_none());
    assert_eq!(records[0].title.as_deref(), Some("Live from the studio"));
}

#[test]
fn test_icy_headers_and_info_stay_separate() {
    let records = normalize(&[
        MetadataEntry::IcyHeaders {
            name: Some("Radio Example".to_string()),
            url: Some("https://radio.example.com".to_string()),
            genre: Some("House".to_string()),
        },
        MetadataEntry::IcyInfo {
            title: Some("Artist - Track".to_string()),
            url: Some("https://radio.example.com/now".to_string()),
        },
    ]);

    assert_eq!(records.len(), 2);

    let headers = &records[0];
    assert_eq!(headers.dialect, MetadataDialect::IcyHeaders);
    assert_eq!(headers.title.as_deref(), Some("Radio Example"));
    assert_eq!(headers.url.as_deref(), Some("https://radio.example.com"));
    assert_eq!(headers.genre.as_deref(), Some("House"));
    assert!(headers.artist.is_none());

    let info = &records[1];
    assert_eq!(info.dialect, MetadataDialect::Icy);
    assert_eq!(info.artist.as_deref(), Some("Artist"));
    assert_eq!(info.title.as_deref(), Some("Track"));
    assert_eq!(info.url.as_deref(), Some("https://radio.example.com/now"));
    assert!(info.genre.is_none());
}

#[test]
fn test_each_icy_update_is_reported() {
    let records = normalize(&[icy_info(Some("A - One")), icy_info(Some("B - Two"))]);

    let titles: Vec<_> = records.iter().map(|r| r.title.as_deref()).collect();
    assert_eq!(titles, vec![Some("One"), Some("Two")]);
}

#[test]
fn test_empty_icy_entries_are_dropped() {
    let records = normalize(&[
        MetadataEntry::IcyHeaders {
            name: None,
            url: None,
            genre: None,
        },
        icy_info(None),
    ]);

    assert!(records.is_empty());
}

#[test]
fn test_icy_url_alone_is_reported() {
    let records = normalize(&[MetadataEntry::IcyInfo {
        title: None,
        url: Some("https://radio.example.com/now".to_string()),
    }]);

    assert_eq!(records.len(), 1);
    assert!(records[0].title.is_none());
    assert!(records.iter().all(|r| !r.is_empty()));
}

// ============================================================================
// Vorbis Comments
// ============================================================================

#[test]
fn test_vorbis_keys() {
    let records = normalize(&[
        vorbis("TITLE", "Opus Track"),
        vorbis("ARTIST", "Composer"),
        vorbis("ALBUM", "Suite"),
        vorbis("DATE", "2021-05-01"),
        vorbis("GENRE", "Classical"),
        vorbis("URL", "https://example.com"),
    ]);

    assert_eq!(
        records,
        vec![UnifiedMetadata {
            dialect: MetadataDialect::VorbisComment,
            title: Some("Opus Track".to_string()),
            url: Some("https://example.com".to_string()),
            artist: Some("Composer".to_string()),
            album: Some("Suite".to_string()),
            date: Some("2021-05-01".to_string()),
            genre: Some("Classical".to_string()),
        }]
    );
}

#[test]
fn test_vorbis_keys_are_case_sensitive() {
    let records = normalize(&[vorbis("title", "lowercase"), vorbis("Artist", "Mixed")]);
    assert!(records.is_empty());

    let records = normalize(&[vorbis("title", "lowercase"), vorbis("ALBUM", "Upper")]);
    assert_eq!(records.len(), 1);
    assert!(records[0].title.is_none());
    assert_eq!(records[0].album.as_deref(), Some("Upper"));
}

// ============================================================================
// QuickTime
// ============================================================================

#[test]
fn test_quicktime_fields() {
    let records = normalize(&[
        mdta("com.apple.quicktime.title", b"Clip"),
        mdta("com.apple.quicktime.artist", b"Director"),
        mdta("com.apple.quicktime.creationdate", b"2020-01-01T00:00:00Z"),
    ]);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.dialect, MetadataDialect::QuickTime);
    assert_eq!(record.title.as_deref(), Some("Clip"));
    assert_eq!(record.artist.as_deref(), Some("Director"));
    assert_eq!(record.date.as_deref(), Some("2020-01-01T00:00:00Z"));
    assert!(record.url.is_none());
}

#[test]
fn test_quicktime_bad_utf8_is_isolated() {
    let records = normalize(&[
        mdta("com.apple.quicktime.title", &[0xc3, 0x28]),
        mdta("com.apple.quicktime.album", b"Still Here"),
    ]);

    assert_eq!(records.len(), 1);
    assert!(records[0].title.is_none());
    assert_eq!(records[0].album.as_deref(), Some("Still Here"));
}

#[test]
fn test_quicktime_only_bad_values_yield_nothing() {
    let records = normalize(&[mdta("com.apple.quicktime.genre", &[0xff])]);
    assert!(records.is_empty());
}

// ============================================================================
// Mixed Batches
// ============================================================================

#[test]
fn test_mixed_batch_produces_one_record_per_dialect() {
    let records = normalize(&[
        vorbis("TITLE", "From Vorbis"),
        id3_text("TIT2", "From ID3"),
        mdta("com.apple.quicktime.title", b"From QuickTime"),
        icy_info(Some("From ICY")),
    ]);

    let dialects: Vec<_> = records.iter().map(|r| r.dialect).collect();
    assert_eq!(
        dialects,
        vec![
            MetadataDialect::Id3,
            MetadataDialect::Icy,
            MetadataDialect::VorbisComment,
            MetadataDialect::QuickTime,
        ]
    );
}
