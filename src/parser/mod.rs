pub mod classify;
pub mod section;
pub mod text;

pub use classify::{classify, Classification};

/// Two-step pipeline: accordion HTML → section text → classification.
pub fn process_html(accordion_html: &str) -> Classification {
    let raw = section::prerequisite_text(accordion_html);
    classify(raw.as_deref())
}
