//! Page title extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};

static TITLE_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| match Selector::parse("title") {
    Ok(selector) => Some(selector),
    Err(e) => {
        log::error!("Failed to parse title selector: {e}");
        None
    }
});

/// Extracts the text of the first `<title>` element.
///
/// Runs of whitespace are collapsed to single spaces. Returns an empty string
/// when the document has no title.
pub fn extract_title(body: &str) -> String {
    let Some(selector) = TITLE_SELECTOR.as_ref() else {
        return String::new();
    };
    // Most non-HTML bodies never mention a title; skip the parse for them
    if !body.to_ascii_lowercase().contains("<title") {
        return String::new();
    }

    let document = Html::parse_document(body);
    document
        .select(selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}
