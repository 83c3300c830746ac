//! Best-effort extraction from the HTML news search page.
//!
//! Used only when the RSS feed comes back empty. The selectors track the
//! search page's generated class names and will drift when the page changes.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::types::NewsItem;

/// Article container selectors; the first one that matches anything wins.
static CONTAINER_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile(&[r#"div[class*="NiLAwe"]"#, "article", ".ipQwMb"]));
static TITLE_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile(&["h3 a", "h4 a", r#"a[class*="DY5T1d"]"#]));
static SUMMARY_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| compile(&[r#"span[class*="xBbh9"]"#, r#"div[class*="xBbh9"]"#]));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid link selector"));
static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").expect("valid time selector"));

fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .map(|css| Selector::parse(css).expect("valid static selector"))
        .collect()
}

/// Parse a search results page into at most `max_items` [`NewsItem`]s.
///
/// Relative links are resolved against `origin`.
pub(crate) fn parse_search_page(html: &str, origin: &Url, max_items: usize) -> Vec<NewsItem> {
    let document = Html::parse_document(html);

    let containers: Vec<ElementRef<'_>> = CONTAINER_SELECTORS
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    containers
        .into_iter()
        .take(max_items)
        .map(|element| {
            let title = first_text(element, &TITLE_SELECTORS);
            let summary = first_text(element, &SUMMARY_SELECTORS);
            let link = element
                .select(&LINK_SELECTOR)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_link(href, origin));
            let date = element
                .select(&TIME_SELECTOR)
                .next()
                .and_then(|t| t.value().attr("datetime"))
                .map(str::to_string);
            NewsItem::new(title, summary, link, date)
        })
        .collect()
}

/// Text of the first element matched by any of `selectors`, tried in order.
fn first_text(element: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        element
            .select(selector)
            .next()
            .map(|found| found.text().collect::<String>())
    })
}

fn resolve_link(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    origin.join(href).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NO_SUMMARY, UNKNOWN_DATE};

    fn origin() -> Url {
        Url::parse("https://news.google.com/").expect("valid origin")
    }

    #[test]
    fn extracts_from_generated_class_containers() {
        let html = r#"
            <html><body>
              <div class="xrnccd NiLAwe mi8Lec">
                <h3><a href="./articles/abc?hl=en-IN">Acme opens new plant</a></h3>
                <span class="xBbh9">Acme will hire 500 workers at the site.</span>
                <time datetime="2025-10-06T08:00:00Z">2 hours ago</time>
              </div>
            </body></html>
        "#;

        let items = parse_search_page(html, &origin(), 10);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Acme opens new plant");
        assert_eq!(items[0].summary, "Acme will hire 500 workers at the site.");
        assert_eq!(
            items[0].link,
            "https://news.google.com/articles/abc?hl=en-IN"
        );
        assert_eq!(items[0].date, "2025-10-06T08:00:00Z");
    }

    #[test]
    fn falls_back_to_article_elements_and_placeholders() {
        let html = r#"
            <article><h4><a href="https://example.com/story">Acme story</a></h4></article>
            <article><a href="/read/2">untitled</a></article>
        "#;

        let items = parse_search_page(html, &origin(), 10);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Acme story");
        assert_eq!(items[0].link, "https://example.com/story");
        assert_eq!(items[0].summary, NO_SUMMARY);
        assert_eq!(items[0].date, UNKNOWN_DATE);
        assert_eq!(items[1].link, "https://news.google.com/read/2");
    }

    #[test]
    fn static_selectors_compile() {
        assert_eq!(CONTAINER_SELECTORS.len(), 3);
        assert_eq!(TITLE_SELECTORS.len(), 3);
        assert_eq!(SUMMARY_SELECTORS.len(), 2);
        let fragment =
            Html::parse_fragment(r#"<a href="/x">x</a><time datetime="2025-01-01">t</time>"#);
        assert_eq!(fragment.select(&LINK_SELECTOR).count(), 1);
        assert_eq!(fragment.select(&TIME_SELECTOR).count(), 1);
    }

    #[test]
    fn title_selectors_are_tried_in_order_per_container() {
        let html = r#"
            <article>
              <a class="DY5T1d" href="/a/1">Generated class title</a>
              <h4><a href="/a/1">Heading title</a></h4>
            </article>
            <article><a class="x DY5T1d" href="/a/2">Only generated title</a></article>
        "#;

        let items = parse_search_page(html, &origin(), 10);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Heading title");
        assert_eq!(items[1].title, "Only generated title");
        assert_eq!(items[1].link, "https://news.google.com/a/2");
    }

    #[test]
    fn caps_items_and_handles_pages_without_matches() {
        let many: String = (0..12)
            .map(|i| format!("<article><h3><a href='/a/{i}'>Story {i}</a></h3></article>"))
            .collect();
        assert_eq!(parse_search_page(&many, &origin(), 10).len(), 10);
        assert!(parse_search_page("<html><p>nothing</p></html>", &origin(), 10).is_empty());
    }
}
