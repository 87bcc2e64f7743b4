//! Item page extraction
//!
//! An item page is turned into a [`MusicRecord`] by five independent rules,
//! all applied to the same document:
//!
//! | Rule | Source | On no match |
//! |------|--------|-------------|
//! | Title | main heading text | empty |
//! | Download link | last archive link in the download table | empty |
//! | Summary | `Description: .. Genres: .. Artist: ..` in the info block | all three empty |
//! | Detail | `Label: value` rows of the detail table | field left empty |
//! | Tags | tag anchors | empty list |
//!
//! No rule ever fails; only fetching the page can.

use crate::crawler::selectors::Selectors;
use crate::record::{MusicDetail, MusicRecord, Summary};
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

const SUMMARY_PATTERN: &str = r"Description:\s+(.*?)\s+Genres:\s+(.*?)\s+Artist:\s+(\w+)";

fn summary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SUMMARY_PATTERN).expect("summary pattern is valid"))
}

/// Builds a record from a parsed item page
pub fn extract_record(document: &Html, selectors: &Selectors) -> MusicRecord {
    let mut record = MusicRecord {
        title: extract_title(document, selectors),
        download_url: extract_download_url(document, selectors).unwrap_or_default(),
        music_detail: extract_detail(document, selectors),
        tags: extract_tags(document, selectors),
        ..Default::default()
    };

    if let Some(summary) = parse_summary(&extract_info_text(document, selectors)) {
        record.apply_summary(summary);
    }

    record
}

/// Text of every heading match, concatenated verbatim
pub fn extract_title(document: &Html, selectors: &Selectors) -> String {
    document
        .select(&selectors.title)
        .flat_map(|element| element.text())
        .collect()
}

/// The last download-table link ending with the archive suffix
///
/// When several links qualify the last one in document order wins.
pub fn extract_download_url(document: &Html, selectors: &Selectors) -> Option<String> {
    document
        .select(&selectors.download_links)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.ends_with(selectors.archive_suffix.as_str()))
        .last()
        .map(str::to_string)
}

fn extract_info_text(document: &Html, selectors: &Selectors) -> String {
    document
        .select(&selectors.info)
        .flat_map(|element| element.text())
        .collect()
}

/// Parses the description/genres/artist triple from the info text
///
/// All three come from one match. Text that does not contain the three
/// labels in order yields `None`, never a partial result.
pub fn parse_summary(text: &str) -> Option<Summary> {
    let captures = summary_regex().captures(text)?;
    Some(Summary {
        description: captures[1].to_string(),
        genres: captures[2].to_string(),
        artist: captures[3].to_string(),
    })
}

/// Reads the technical detail table
pub fn extract_detail(document: &Html, selectors: &Selectors) -> MusicDetail {
    let rows = document.select(&selectors.detail_rows).map(|row| {
        row.select(&selectors.detail_cells)
            .flat_map(|cell| cell.text())
            .collect::<String>()
    });

    parse_detail_rows(rows)
}

/// Applies `Label: value` rows to a [`MusicDetail`]
///
/// Labels must equal the first segment exactly, case and spacing included.
/// Values keep their original spacing,
/// except `Duration`, whose `mm:ss` value is split by the delimiter and
/// rejoined. Later rows overwrite earlier ones with the same label.
pub fn parse_detail_rows<I, S>(rows: I) -> MusicDetail
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut detail = MusicDetail::default();

    for row in rows {
        let segments: Vec<&str> = row.as_ref().split(':').collect();
        if segments.len() < 2 {
            continue;
        }

        match segments[0] {
            "Quality" => detail.quality = segments[1].to_string(),
            "Duration" => detail.duration = rejoin_duration(&segments[1..]),
            "Tempo" => detail.tempo = segments[1].to_string(),
            "Audio Size" => detail.audio_size = segments[1].to_string(),
            _ => {}
        }
    }

    detail
}

/// Restores a duration the delimiter split cut into minutes and seconds
fn rejoin_duration(segments: &[&str]) -> String {
    match segments {
        [minutes, seconds, ..] => format!("{}:{}", minutes.trim(), seconds.trim()),
        [only] => only.trim().to_string(),
        [] => String::new(),
    }
}

/// Text of every tag anchor, in document order
pub fn extract_tags(document: &Html, selectors: &Selectors) -> Vec<String> {
    document
        .select(&selectors.tags)
        .map(|anchor| anchor.text().collect::<String>())
        .collect()
}
