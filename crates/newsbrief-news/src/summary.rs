//! Heuristic reduction of a feed description to a one-line summary.
//!
//! The rules run as a prioritized chain: split before a publication
//! name, else cut after the first sentence, and if what is left is too
//! short to be useful, fall back to a plain truncation of the cleaned text.

use std::sync::LazyLock;

use regex::Regex;

/// Summaries shorter than this (in chars) are replaced by the truncation fallback.
const MIN_SUMMARY_CHARS: usize = 20;
/// Length of the truncation fallback, before the ellipsis.
const TRUNCATE_CHARS: usize = 200;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

// Whitespace run followed by a capitalized word and a masthead suffix,
// e.g. "... growth  Economic Times".
static PUBLICATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s+[A-Z][a-z]+\s*(?:Times|Post|News|Journal|Today|Standard|Express|Telegraph|Mail|Guardian|Independent|Star|Sun|Mirror|Chronicle|Gazette|Herald|Tribune|Observer|Daily|Weekly)",
    )
    .expect("valid publication regex")
});

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Produce the summary for a raw (possibly HTML) feed description.
#[must_use]
pub fn summarize_description(raw: &str) -> String {
    let text = strip_markup(raw);

    let summary = split_before_publication(&text).unwrap_or_else(|| first_sentence(&text));

    if summary.chars().count() < MIN_SUMMARY_CHARS {
        truncate_with_ellipsis(&text)
    } else {
        summary
    }
}

/// Remove markup tags and decode the handful of entities feeds actually use.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let no_tags = TAG_RE.replace_all(html, "");
    decode_entities(&no_tags)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", "\u{a0}")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Head of `text` before the first publication-name boundary, if one exists.
#[must_use]
pub fn split_before_publication(text: &str) -> Option<String> {
    PUBLICATION_RE
        .find(text)
        .map(|m| text[..m.start()].trim().to_string())
}

/// Text up to and including the first sentence terminator that is followed
/// by whitespace; the whole (trimmed) text when there is none.
#[must_use]
pub fn first_sentence(text: &str) -> String {
    match SENTENCE_END_RE.find(text) {
        // The terminator is a single ASCII byte.
        Some(m) => text[..=m.start()].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// First [`TRUNCATE_CHARS`] chars plus `...`, or the whole text when shorter.
#[must_use]
pub fn truncate_with_ellipsis(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > TRUNCATE_CHARS {
        let head: String = text.chars().take(TRUNCATE_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
