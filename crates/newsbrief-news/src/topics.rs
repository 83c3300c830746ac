//! Keyword topic tagging.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Business and finance vocabulary, in the order tags are emitted.
const BUSINESS_TERMS: &[&str] = &[
    "Profit",
    "Revenue",
    "Sales",
    "Growth",
    "Decline",
    "Stock",
    "Share",
    "Market",
    "Investment",
    "Investor",
    "CEO",
    "Executive",
    "Launch",
    "Product",
    "Service",
    "Expansion",
    "Acquisition",
    "Merger",
    "Partnership",
    "Earnings",
    "Quarter",
    "Financial",
    "Report",
    "Technology",
    "Innovation",
    "Development",
    "Customer",
    "User",
    "Regulation",
    "Compliance",
    "Lawsuit",
    "Legal",
    "Announce",
    "Release",
    "Future",
    "Strategy",
    "Plan",
    "Competition",
    "Competitor",
];

const STOPWORDS: &[&str] = &[
    "the", "and", "a", "in", "to", "of", "is", "that", "it", "with", "as", "for", "was", "on",
    "are", "be", "by", "at", "an", "this", "have", "from", "or", "but", "not", "what", "all",
];

/// Vocabulary hits needed before the frequency fallback is skipped.
const MIN_TERM_HITS: usize = 2;
/// Tags contributed by the frequency fallback.
const FALLBACK_TAGS: usize = 3;
/// Fallback tokens must be longer than this many chars.
const MIN_TOKEN_CHARS: usize = 3;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

/// Derive topic tags for `text`, ignoring `subject` (usually the company).
///
/// Vocabulary terms found anywhere in the text (case-insensitive) come
/// first. With fewer than two of those, the three most frequent remaining
/// words longer than three chars are appended; equal counts keep the order
/// the words first appear in. The result never contains duplicates.
#[must_use]
pub fn extract_topics(text: &str, subject: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let subject = subject.to_lowercase();

    let mut topics: Vec<String> = BUSINESS_TERMS
        .iter()
        .filter(|term| {
            let term = term.to_lowercase();
            term != subject && lower.contains(&term)
        })
        .map(|term| (*term).to_string())
        .collect();

    if topics.len() >= MIN_TERM_HITS {
        return topics;
    }

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in WORD_RE.find_iter(&lower).map(|m| m.as_str()) {
        if word.chars().count() <= MIN_TOKEN_CHARS
            || word == subject
            || STOPWORDS.contains(&word)
            || topics.iter().any(|t| t.to_lowercase() == word)
        {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    topics.extend(order.into_iter().take(FALLBACK_TAGS).map(capitalize));
    topics
}

/// Upper-case the first char and lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
