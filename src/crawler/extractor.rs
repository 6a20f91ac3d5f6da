//! HTML extraction of visible text and same-site links
//!
//! This module turns a fetched document into:
//! - The page title (from `<title>`)
//! - The visible text, in document order, one block per line
//! - Absolute same-site links to follow

use crate::url::SiteScope;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose content is never visible text
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "head", "nav", "object",
    "canvas",
];

/// Elements that start a new line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Everything the crawler keeps from one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The page title (from the `<title>` tag)
    pub title: Option<String>,

    /// Visible text; empty when the page has none
    pub text: String,

    /// Same-site absolute links, deduplicated, in first-seen order
    pub links: Vec<Url>,
}

/// Extracts text and links, keeping links on the same site as `base_url`
///
/// Malformed markup is parsed best-effort; this never fails. A document with
/// no visible text yields an empty string, and one with no same-site anchors
/// yields no links.
///
/// # Example
///
/// ```
/// use gleaner::crawler::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>T</title></head><body><p>Hello</p>
///     <a href="/y">same</a> <a href="https://b.example/x">other</a></body></html>"#;
/// let page = extract(html, &Url::parse("https://a.example/page").unwrap());
/// assert_eq!(page.text, "Hello\nsame other");
/// assert_eq!(page.links.len(), 1);
/// assert_eq!(page.links[0].as_str(), "https://a.example/y");
/// ```
pub fn extract(html: &str, base_url: &Url) -> ExtractedPage {
    match SiteScope::for_url(base_url) {
        Ok(scope) => extract_page(html, base_url, &scope),
        Err(_) => {
            let document = Html::parse_document(html);
            ExtractedPage {
                title: extract_title(&document),
                text: extract_text(&document),
                links: Vec::new(),
            }
        }
    }
}

/// Extracts text and links, keeping links that fall inside `scope`
///
/// Relative links are resolved against `base_url`, which is usually the
/// post-redirect URL of the page, while `scope` is the crawl's seed site.
pub fn extract_page(html: &str, base_url: &Url, scope: &SiteScope) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url, scope),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Flattens the visible text of the document
fn extract_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(&document.root_element(), &mut raw);

    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: &ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) => {
                let tag = el.name();
                if SKIP_TAGS.contains(&tag) {
                    continue;
                }

                let is_block = BLOCK_TAGS.contains(&tag);
                if is_block {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
                if is_block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts same-site anchor targets from the document
fn extract_links(document: &Html, base_url: &Url, scope: &SiteScope) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        // Downloads are not pages
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(absolute) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        if scope.contains(&absolute) && seen.insert(absolute.as_str().to_string()) {
            links.push(absolute);
        }
    }

    links
}

/// Resolves a link href to an absolute http(s) URL without a fragment
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - fragment-only links (same page anchors)
/// - Invalid URLs or non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}
