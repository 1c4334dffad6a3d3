use url::Url;

/// Catalog columns carried through verbatim in merge mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDetails {
    pub name: String,
    pub category: String,
    pub year: String,
}

/// One subject to scrape: its catalog URL plus any input-row details.
#[derive(Debug, Clone)]
pub struct Subject {
    pub code: String,
    pub url: String,
    pub details: Option<SubjectDetails>,
}

impl Subject {
    /// Build the subject page URL as `{base}/{year}/{code}`.
    pub fn new(base_url: &str, year: &str, code: &str, details: Option<SubjectDetails>) -> Self {
        let code = code.trim();
        let url = format!("{}/{}/{}", base_url.trim_end_matches('/'), year.trim(), code);
        // A blank code would otherwise pick up the year segment.
        let derived = if code.is_empty() { None } else { code_from_url(&url) };
        Subject {
            code: derived.unwrap_or_else(|| code.to_string()),
            url,
            details,
        }
    }
}

/// Last non-empty path segment of a subject URL, e.g. `CSIT321`.
/// Percent-escapes added by URL parsing are undone, so the code reads as written.
pub fn code_from_url(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            }),
        Err(_) => url
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
    }
}
