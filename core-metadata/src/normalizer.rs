//! Embedded Metadata Normalization
//!
//! Turns one batch of raw tag entries into zero or more [`UnifiedMetadata`]
//! records. Four independent passes run over the same batch, one per dialect:
//!
//! | Pass      | Entries                    | Output                                   |
//! |-----------|----------------------------|------------------------------------------|
//! | ID3       | `Id3Text`, `Id3Url`        | one `id3` record if any field was found  |
//! | ICY       | `IcyHeaders`, `IcyInfo`    | one `icy-headers` / `icy` record per entry |
//! | Vorbis    | `VorbisComment`            | one `vorbis-comment` record if any field |
//! | QuickTime | `Mdta`                     | one `quicktime` record if any field      |
//!
//! Within a pass, a later entry for the same field overwrites an earlier one.
//!
//! ## Usage
//!
//! ```
//! use bridge_traits::{MetadataDialect, MetadataEntry};
//! use core_metadata::normalize;
//!
//! let batch = vec![
//!     MetadataEntry::Id3Text { id: "TIT2".into(), value: "Song".into() },
//!     MetadataEntry::Id3Text { id: "TPE1".into(), value: "Band".into() },
//! ];
//!
//! let records = normalize(&batch);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].dialect, MetadataDialect::Id3);
//! assert_eq!(records[0].title.as_deref(), Some("Song"));
//! ```

use bridge_traits::metadata::{MetadataDialect, MetadataEntry, UnifiedMetadata};
use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{MetadataError, Result};
use crate::tables::{
    lookup, lookup_ignore_case, Field, ID3_TEXT_FRAMES, ID3_URL_FRAMES, QUICKTIME_MDTA_KEYS,
    VORBIS_COMMENT_KEYS,
};

/// Separator between artist and title in ICY `StreamTitle` values.
pub const ICY_TITLE_SEPARATOR: &str = " - ";

/// Run every dialect pass over `entries`.
///
/// Records come out in pass order: ID3, ICY (in entry order), Vorbis, QuickTime.
pub fn normalize(entries: &[MetadataEntry]) -> Vec<UnifiedMetadata> {
    let mut records = Vec::new();

    records.extend(extract_id3(entries));
    records.extend(extract_icy(entries));
    records.extend(extract_vorbis_comments(entries));
    records.extend(extract_quicktime(entries));

    debug!(
        entries = entries.len(),
        records = records.len(),
        "Normalized metadata batch"
    );

    records
}

/// ID3 pass (MP3 and friends).
pub fn extract_id3(entries: &[MetadataEntry]) -> Option<UnifiedMetadata> {
    let mut record = UnifiedMetadata::new(MetadataDialect::Id3);

    for entry in entries {
        match entry {
            MetadataEntry::Id3Text { id, value } => {
                if let Some(field) = lookup_ignore_case(ID3_TEXT_FRAMES, id) {
                    set_field(&mut record, field, value.clone());
                }
            }
            MetadataEntry::Id3Url { id, url } => {
                if let Some(field) = lookup_ignore_case(ID3_URL_FRAMES, id) {
                    set_field(&mut record, field, url.clone());
                }
            }
            _ => {}
        }
    }

    non_empty(record)
}

/// ICY pass (Shoutcast / Icecast).
///
/// Headers and in-band updates are reported as separate records and are not
/// merged, even when both appear in one batch. An entry with no fields set
/// produces nothing.
pub fn extract_icy(entries: &[MetadataEntry]) -> Vec<UnifiedMetadata> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            MetadataEntry::IcyHeaders { name, url, genre } => non_empty(UnifiedMetadata {
                title: name.clone(),
                url: url.clone(),
                genre: genre.clone(),
                ..UnifiedMetadata::new(MetadataDialect::IcyHeaders)
            }),
            MetadataEntry::IcyInfo { title, url } => {
                let (artist, title) = match title.as_deref() {
                    Some(raw) => {
                        let (artist, title) = split_stream_title(raw);
                        (artist.map(str::to_string), Some(title.to_string()))
                    }
                    None => (None, None),
                };

                non_empty(UnifiedMetadata {
                    title,
                    url: url.clone(),
                    artist,
                    ..UnifiedMetadata::new(MetadataDialect::Icy)
                })
            }
            _ => None,
        })
        .collect()
}

/// Split an ICY `StreamTitle` into `(artist, title)` at the first `" - "`.
///
/// Without a separator the whole string is the title.
pub fn split_stream_title(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(ICY_TITLE_SEPARATOR) {
        Some((artist, title)) => (Some(artist), title),
        None => (None, raw),
    }
}

/// Vorbis comment pass (Vorbis, FLAC, Opus, Speex, Theora).
pub fn extract_vorbis_comments(entries: &[MetadataEntry]) -> Option<UnifiedMetadata> {
    let mut record = UnifiedMetadata::new(MetadataDialect::VorbisComment);

    for entry in entries {
        if let MetadataEntry::VorbisComment { key, value } = entry {
            if let Some(field) = lookup(VORBIS_COMMENT_KEYS, key) {
                set_field(&mut record, field, value.clone());
            }
        }
    }

    non_empty(record)
}

/// QuickTime `mdta` pass (mov, qt, m4a).
///
/// A value that is not valid UTF-8 leaves its field unset; the rest of the
/// batch is still processed.
pub fn extract_quicktime(entries: &[MetadataEntry]) -> Option<UnifiedMetadata> {
    let mut record = UnifiedMetadata::new(MetadataDialect::QuickTime);

    for entry in entries {
        let MetadataEntry::Mdta { key, value } = entry else {
            continue;
        };
        let Some(field) = lookup(QUICKTIME_MDTA_KEYS, key) else {
            continue;
        };

        match decode_utf8(key, value) {
            Ok(text) => set_field(&mut record, field, text),
            Err(err) => warn!(key = %key, error = %err, "Skipping undecodable mdta value"),
        }
    }

    non_empty(record)
}

fn decode_utf8(key: &str, value: &Bytes) -> Result<String> {
    String::from_utf8(value.to_vec()).map_err(|source| MetadataError::InvalidUtf8 {
        key: key.to_string(),
        source,
    })
}

fn set_field(record: &mut UnifiedMetadata, field: Field, value: String) {
    let slot = match field {
        Field::Title => &mut record.title,
        Field::Url => &mut record.url,
        Field::Artist => &mut record.artist,
        Field::Album => &mut record.album,
        Field::Date => &mut record.date,
        Field::Genre => &mut record.genre,
    };
    *slot = Some(value);
}

fn non_empty(record: UnifiedMetadata) -> Option<UnifiedMetadata> {
    if record.is_empty() {
        None
    } else {
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id3(id: &str, value: &str) -> MetadataEntry {
        MetadataEntry::Id3Text {
            id: id.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn split_with_separator() {
        assert_eq!(
            split_stream_title("Daft Punk - One More Time"),
            (Some("Daft Punk"), "One More Time")
        );
    }

    #[test]
    fn split_uses_first_separator() {
        assert_eq!(split_stream_title("A - B - C"), (Some("A"), "B - C"));
    }

    #[test]
    fn split_without_separator() {
        assert_eq!(split_stream_title("Station Jingle"), (None, "Station Jingle"));
        assert_eq!(split_stream_title("A-B"), (None, "A-B"));
    }

    #[test]
    fn later_id3_frame_overwrites_earlier() {
        let record = extract_id3(&[id3("TT2", "Old"), id3("TIT2", "New")]).unwrap();
        assert_eq!(record.title.as_deref(), Some("New"));
    }

    #[test]
    fn id3_ignores_unmapped_url_frames() {
        let entries = vec![MetadataEntry::Id3Url {
            id: "WCOM".to_string(),
            url: "https://shop.example.com".to_string(),
        }];
        assert!(extract_id3(&entries).is_none());
    }

    #[test]
    fn decode_failure_is_reported_per_field() {
        let err = decode_utf8("com.apple.quicktime.title", &Bytes::from_static(&[0xff, 0xfe]))
            .unwrap_err();
        assert!(err.to_string().contains("com.apple.quicktime.title"));
    }
}
