//! Spoken summary of an analysis: report text and speech synthesis.

mod tts;

use crate::types::{NewsItem, Sentiment, SentimentTally};

pub use tts::SpeechClient;

/// The only language the spoken report is produced in.
pub const SPEECH_LANGUAGE: &str = "hi";

/// Items read out individually in the report.
const HEADLINE_COUNT: usize = 3;

/// Build the Hindi report text read out for a company's analysis.
#[must_use]
pub fn hindi_report(company: &str, tally: &SentimentTally, items: &[NewsItem]) -> String {
    let mut report = format!(
        "कंपनी {company} के समाचार विश्लेषण का सारांश:\n\
         हमने कुल {total} समाचार लेखों का विश्लेषण किया।\n\
         इनमें से {positive} लेख सकारात्मक, {negative} लेख नकारात्मक, और {neutral} लेख तटस्थ पाए गए।\n",
        total = tally.total(),
        positive = tally.positive,
        negative = tally.negative,
        neutral = tally.neutral,
    );

    if !items.is_empty() {
        report.push_str("\nप्रमुख समाचार:\n");
        for (i, item) in items.iter().take(HEADLINE_COUNT).enumerate() {
            report.push_str(&format!("{}. {}. ", i + 1, item.title));
            report.push_str(match item.sentiment() {
                Some(Sentiment::Positive) => "यह समाचार सकारात्मक है। ",
                Some(Sentiment::Negative) => "यह समाचार नकारात्मक है। ",
                _ => "यह समाचार तटस्थ है। ",
            });
        }
    }

    let tone = match tally.dominant() {
        Some(Sentiment::Positive) => "अधिकतर सकारात्मक",
        Some(Sentiment::Negative) => "अधिकतर नकारात्मक",
        _ => "मिश्रित या तटस्थ",
    };
    report.push_str(&format!(
        "\nसमग्र रूप से, {company} के बारे में समाचार {tone} हैं।"
    ));

    report
}
