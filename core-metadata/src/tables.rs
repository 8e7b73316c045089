//! Tag-id lookup tables, one per dialect.
//!
//! Adding a tag variant is a row here, not a new branch in the normalizer.

/// Canonical field a raw tag maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Url,
    Artist,
    Album,
    Date,
    Genre,
}

/// ID3 text frames, v2.3/v2.4 four-character ids and v2.2 three-character ids.
pub const ID3_TEXT_FRAMES: &[(&str, Field)] = &[
    ("TIT2", Field::Title),
    ("TT2", Field::Title),
    ("TALB", Field::Album),
    ("TOAL", Field::Album),
    ("TAL", Field::Album),
    ("TOPE", Field::Artist),
    ("TPE1", Field::Artist),
    ("TP1", Field::Artist),
    ("TDRC", Field::Date),
    ("TOR", Field::Date),
    ("TCON", Field::Genre),
    ("TCO", Field::Genre),
];

/// ID3 URL link frames.
pub const ID3_URL_FRAMES: &[(&str, Field)] = &[
    ("WOAS", Field::Url),
    ("WOAF", Field::Url),
    ("WOAR", Field::Url),
    ("WAR", Field::Url),
];

/// Vorbis comment keys. Matched exactly.
pub const VORBIS_COMMENT_KEYS: &[(&str, Field)] = &[
    ("TITLE", Field::Title),
    ("ARTIST", Field::Artist),
    ("ALBUM", Field::Album),
    ("DATE", Field::Date),
    ("GENRE", Field::Genre),
    ("URL", Field::Url),
];

/// QuickTime `mdta` keys. Matched exactly.
pub const QUICKTIME_MDTA_KEYS: &[(&str, Field)] = &[
    ("com.apple.quicktime.title", Field::Title),
    ("com.apple.quicktime.artist", Field::Artist),
    ("com.apple.quicktime.album", Field::Album),
    ("com.apple.quicktime.creationdate", Field::Date),
    ("com.apple.quicktime.genre", Field::Genre),
];

/// Exact, case-sensitive lookup.
pub fn lookup(table: &[(&str, Field)], key: &str) -> Option<Field> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, field)| *field)
}

/// ASCII case-insensitive lookup.
pub fn lookup_ignore_case(table: &[(&str, Field)], key: &str) -> Option<Field> {
    table
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map(|(_, field)| *field)
}
