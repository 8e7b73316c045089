//! # Metadata Normalization Module
//!
//! Unifies embedded metadata from four tag dialects into one record shape.
//!
//! ## Overview
//!
//! This module handles:
//! - ID3 text and URL frames (MP3)
//! - ICY headers and in-band stream titles (Shoutcast/Icecast)
//! - Vorbis comments (Ogg, FLAC, Opus)
//! - QuickTime `mdta` items (mov, m4a)
//!
//! Normalization is pure and stateless. Malformed individual values are
//! dropped at the field level and never abort a batch.

pub mod error;
pub mod normalizer;
pub mod tables;

pub use error::{MetadataError, Result};
pub use normalizer::{
    extract_icy, extract_id3, extract_quicktime, extract_vorbis_comments, normalize,
    split_stream_title,
};
