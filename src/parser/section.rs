use std::sync::LazyLock;

use scraper::{Html, Selector};

pub const PREREQUISITE_SECTION_ID: &str = "Pre-Requisite";

static PREREQUISITE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&format!("#{}", PREREQUISITE_SECTION_ID)).unwrap());

/// Text of the `#Pre-Requisite` element inside the expanded accordion HTML.
///
/// Every text node is trimmed and blank ones dropped; the rest are joined
/// with no separator. Returns `None` when the element is missing.
pub fn prerequisite_text(accordion_html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(accordion_html);
    let element = fragment.select(&PREREQUISITE_SEL).next()?;

    Some(
        element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<String>(),
    )
}
