//! Output record types
//!
//! A [`MusicRecord`] is built once per item page and serialized as a single
//! JSON object. Field names follow the catalog's original export format.

use serde::{Serialize, Serializer};

/// Structured metadata extracted from one item page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MusicRecord {
    /// Heading text of the item page
    pub title: String,

    /// Free-text description from the info block
    pub description: String,

    /// Genre list from the info block
    pub genres: String,

    /// Artist name from the info block
    pub artist: String,

    /// Technical attributes from the detail table
    pub music_detail: MusicDetail,

    /// Archive download link
    pub download_url: String,

    /// Tag labels, written out as one comma-joined string
    #[serde(serialize_with = "join_tags")]
    pub tags: Vec<String>,
}

/// Technical attributes of an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MusicDetail {
    pub quality: String,
    pub duration: String,
    pub tempo: String,
    pub audio_size: String,
}

/// The description/genres/artist triple, which is only ever extracted as a whole
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub description: String,
    pub genres: String,
    pub artist: String,
}

impl MusicRecord {
    /// Applies a summary to the record's three info fields
    pub fn apply_summary(&mut self, summary: Summary) {
        self.description = summary.description;
        self.genres = summary.genres;
        self.artist = summary.artist;
    }
}

fn join_tags<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&tags.join(","))
}
