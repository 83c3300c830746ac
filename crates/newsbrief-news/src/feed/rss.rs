//! RSS document parsing into [`NewsItem`]s.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::NewsError;
use crate::summary::summarize_description;
use crate::types::NewsItem;

/// Item sub-element currently being read.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Link,
    PubDate,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"description" => Some(Self::Description),
            b"link" => Some(Self::Link),
            b"pubDate" => Some(Self::PubDate),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ItemFields {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    pub_date: Option<String>,
}

impl ItemFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Link => &mut self.link,
            Field::PubDate => &mut self.pub_date,
        }
    }

    fn append(&mut self, field: Field, text: &str) {
        self.slot(field).get_or_insert_with(String::new).push_str(text);
    }

    fn into_item(self) -> NewsItem {
        let summary = self
            .description
            .filter(|d| !d.trim().is_empty())
            .map(|d| summarize_description(&d));
        NewsItem::new(self.title, summary, self.link, self.pub_date)
    }
}

/// Named HTML entities that feeds put in titles and descriptions. XML only
/// predefines five, so anything else would fail to unescape.
fn html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{b7}",
        "euro" => "\u{20ac}",
        "pound" => "\u{a3}",
        "yen" => "\u{a5}",
        "cent" => "\u{a2}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{b0}",
        "times" => "\u{d7}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        _ => return None,
    })
}

/// Parse an RSS XML feed into at most `max_items` [`NewsItem`]s.
///
/// Reads `<title>`, `<description>`, `<link>`, and `<pubDate>` from each
/// `<item>`, as text or CDATA. Descriptions go through the summary chain;
/// missing fields become placeholders. Items are taken in document order.
/// Text with an entity that cannot be resolved is kept verbatim.
///
/// # Errors
///
/// Returns [`NewsError::Xml`] if the XML is malformed.
pub(crate) fn parse_rss_feed(xml: &str, max_items: usize) -> Result<Vec<NewsItem>, NewsError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<ItemFields> = None;
    let mut field: Option<Field> = None;

    loop {
        if items.len() >= max_items {
            break;
        }
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    current = Some(ItemFields::default());
                    field = None;
                } else if current.is_some() {
                    field = Field::from_tag(name.as_ref());
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    if let Some(fields) = current.take() {
                        items.push(fields.into_item());
                    }
                    field = None;
                } else if field.is_some_and(|f| Some(f) == Field::from_tag(name.as_ref())) {
                    field = None;
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" {
                    if current.is_none() {
                        items.push(ItemFields::default().into_item());
                    }
                } else if let (Some(fields), Some(f)) =
                    (current.as_mut(), Field::from_tag(name.as_ref()))
                {
                    fields.slot(f).get_or_insert_with(String::new);
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(fields), Some(f)) = (current.as_mut(), field) {
                    match e.unescape_with(html_entity) {
                        Ok(text) => fields.append(f, &text),
                        Err(_) => fields.append(f, &String::from_utf8_lossy(&e)),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(fields), Some(f)) = (current.as_mut(), field) {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    fields.append(f, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(NewsError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}
