// src/notes.rs
// Note text written into documents, and the markers later used to style it

use crate::docs::text::utf16_len;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Fixed literal written into a document and later located for styling.
/// The styled length is always derived from the literal itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker(&'static str);

impl Marker {
    pub const fn new(text: &'static str) -> Self {
        Self(text)
    }

    pub fn text(&self) -> &'static str {
        self.0
    }

    /// Length in document units (UTF-16)
    pub fn utf16_len(&self) -> u32 {
        utf16_len(self.0)
    }
}

pub const HEADER_TEXT: Marker = Marker::new("Notes");
pub const CLIP_ANCHOR: Marker = Marker::new("Click here to watch the clip");
pub const TRANSCRIPT_LABEL: Marker = Marker::new("Transcript:");
pub const INSIGHTS_LABEL: Marker = Marker::new("Insights:");

/// Last word of `CLIP_ANCHOR`; standalone occurrences get the clip link
pub const ANCHOR_WORD: &str = "clip";

pub const HEADER_FONT: &str = "Arial";
pub const HEADER_FONT_SIZE_PT: f32 = 26.0;

/// `"Notes\n\n"`, inserted at index 1 of a fresh document
pub fn header_block() -> String {
    format!("{}\n\n", HEADER_TEXT.text())
}

pub fn link_block(start_secs: f64, end_secs: f64) -> String {
    format!(
        "\n{}\nStart Time: {}\nEnd Time: {}\n\n",
        CLIP_ANCHOR.text(),
        format_time(start_secs),
        format_time(end_secs)
    )
}

pub fn transcript_block(transcript: &str) -> String {
    format!("{}\n{}\n", TRANSCRIPT_LABEL.text(), transcript.trim())
}

pub fn insights_block(insights: &str) -> String {
    format!("\n{}\n{}\n", INSIGHTS_LABEL.text(), strip_insights_prefix(insights))
}

/// Drop a leading "Key Insights:" the model sometimes adds
pub fn strip_insights_prefix(insights: &str) -> String {
    static PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    let re = PREFIX_RE
        .get_or_init(|| Regex::new(r"(?i)^\s*key insights:\s*").expect("valid prefix regex"));
    re.replace(insights, "").trim_end().to_string()
}

/// `HH:MM:SS`, seconds floored
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Source URL with `t=<floor(start)>`, replacing any existing `t`
pub fn timestamped_url(source: &Url, start_secs: f64) -> String {
    let start = if start_secs.is_finite() && start_secs > 0.0 {
        start_secs.floor() as u64
    } else {
        0
    };

    let kept: Vec<(String, String)> = source
        .query_pairs()
        .filter(|(key, _)| key != "t")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = source.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("t", &start.to_string());
    }
    url.to_string()
}

/// Strip a trailing `" - <label>"` and surrounding whitespace
pub fn clean_title(title: &str, source_label: &str) -> String {
    let suffix = format!(" - {}", source_label);
    let trimmed = title.trim();
    trimmed
        .strip_suffix(suffix.as_str())
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

pub fn document_title(clean_title: &str, source_label: &str) -> String {
    format!("{} - {}", clean_title, source_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_lengths_follow_text() {
        assert_eq!(CLIP_ANCHOR.utf16_len(), 28);
        assert_eq!(TRANSCRIPT_LABEL.utf16_len(), 11);
        assert_eq!(INSIGHTS_LABEL.utf16_len(), 9);
        assert_eq!(HEADER_TEXT.utf16_len(), 5);
        assert!(CLIP_ANCHOR.text().ends_with(ANCHOR_WORD));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00:00");
        assert_eq!(format_time(10.9), "00:00:10");
        assert_eq!(format_time(3725.0), "01:02:05");
        assert_eq!(format_time(-4.0), "00:00:00");
        assert_eq!(format_time(f64::NAN), "00:00:00");
    }

    #[test]
    fn test_timestamped_url_replaces_existing_t() {
        let url = Url::parse("https://www.youtube.com/watch?v=abc&t=99").unwrap();
        assert_eq!(
            timestamped_url(&url, 10.7),
            "https://www.youtube.com/watch?v=abc&t=10"
        );
    }

    #[test]
    fn test_blocks() {
        assert_eq!(transcript_block(" hello world "), "Transcript:\nhello world\n");
        assert_eq!(
            link_block(10.0, 40.0),
            "\nClick here to watch the clip\nStart Time: 00:00:10\nEnd Time: 00:00:40\n\n"
        );
        assert_eq!(
            insights_block("Key Insights: 1. Ship it"),
            "\nInsights:\n1. Ship it\n"
        );
        assert_eq!(header_block(), "Notes\n\n");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("My Video - YouTube", "YouTube"), "My Video");
        assert_eq!(clean_title("  My Video  ", "YouTube"), "My Video");
        assert_eq!(clean_title("A - YouTube - YouTube", "YouTube"), "A - YouTube");
        assert_eq!(document_title("My Video", "YouTube"), "My Video - YouTube");
    }
}
