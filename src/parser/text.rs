use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run (newlines and tabs included) to one space and trim.
pub fn normalize(text: Option<&str>) -> Option<String> {
    text.map(collapse)
}

pub fn collapse(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_stays_absent() {
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn collapses_mixed_whitespace() {
        let raw = "  Pre-requisites:\n\tCSIT121   and\r\n CSIT131  ";
        assert_eq!(
            normalize(Some(raw)).as_deref(),
            Some("Pre-requisites: CSIT121 and CSIT131")
        );
    }

    #[test]
    fn blank_becomes_empty() {
        assert_eq!(normalize(Some(" \n\t ")).as_deref(), Some(""));
    }

    #[test]
    fn idempotent() {
        for s in ["", "a", "  a  b ", "x\n\ny\tz", "Co-requisites: CSIT110."] {
            let once = normalize(Some(s));
            assert_eq!(normalize(once.as_deref()), once);
        }
    }
}
