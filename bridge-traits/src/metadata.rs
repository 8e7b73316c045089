//! Raw embedded-metadata entries and the unified record produced from them.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw entry as surfaced by the engine's container/stream parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataEntry {
    /// ID3 text information frame (`TIT2`, `TPE1`, ...).
    Id3Text { id: String, value: String },
    /// ID3 URL link frame (`WOAS`, `WOAR`, ...).
    Id3Url { id: String, url: String },
    /// ICY response headers of a Shoutcast/Icecast stream.
    IcyHeaders {
        name: Option<String>,
        url: Option<String>,
        genre: Option<String>,
    },
    /// In-band ICY update (`StreamTitle`/`StreamUrl`).
    IcyInfo {
        title: Option<String>,
        url: Option<String>,
    },
    /// Vorbis comment (Vorbis, FLAC, Opus, Speex).
    VorbisComment { key: String, value: String },
    /// QuickTime `mdta` item with its raw value bytes.
    Mdta { key: String, value: Bytes },
}

/// Tag family a [`UnifiedMetadata`] record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataDialect {
    #[serde(rename = "id3")]
    Id3,
    #[serde(rename = "icy-headers")]
    IcyHeaders,
    #[serde(rename = "icy")]
    Icy,
    #[serde(rename = "vorbis-comment")]
    VorbisComment,
    #[serde(rename = "quicktime")]
    QuickTime,
}

impl MetadataDialect {
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataDialect::Id3 => "id3",
            MetadataDialect::IcyHeaders => "icy-headers",
            MetadataDialect::Icy => "icy",
            MetadataDialect::VorbisComment => "vorbis-comment",
            MetadataDialect::QuickTime => "quicktime",
        }
    }
}

impl fmt::Display for MetadataDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dialect-independent metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedMetadata {
    pub dialect: MetadataDialect,
    pub title: Option<String>,
    pub url: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
}

impl UnifiedMetadata {
    /// Empty record for `dialect`.
    pub fn new(dialect: MetadataDialect) -> Self {
        Self {
            dialect,
            title: None,
            url: None,
            artist: None,
            album: None,
            date: None,
            genre: None,
        }
    }

    /// `true` when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.date.is_none()
            && self.genre.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record() {
        let mut meta = UnifiedMetadata::new(MetadataDialect::Id3);
        assert!(meta.is_empty());

        meta.genre = Some("Jazz".to_string());
        assert!(!meta.is_empty());
    }

    #[test]
    fn dialect_wire_names() {
        assert_eq!(MetadataDialect::IcyHeaders.as_str(), "icy-headers");
        assert_eq!(
            serde_json::to_string(&MetadataDialect::VorbisComment).unwrap(),
            "\"vorbis-comment\""
        );
    }
}
