use std::sync::LazyLock;

use regex::Regex;

use super::text::{collapse, normalize};

/// Phrases that mark a subject as having no requirements at all.
/// Checked by case-insensitive containment, so "none" also hits "nonetheless".
pub const NO_REQUIREMENT_PHRASES: &[&str] = &["no prerequisites", "none", "n/a"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Prerequisites,
    Corequisites,
}

struct Rule {
    field: Field,
    pattern: Regex,
    /// Cut every span this pattern matches out of the working text.
    strip: bool,
    /// No later rule for the same field is tried once this one matches.
    stop: bool,
}

impl Rule {
    fn new(field: Field, pattern: &str, strip: bool, stop: bool) -> Self {
        Rule {
            field,
            pattern: Regex::new(pattern).unwrap(),
            strip,
            stop,
        }
    }
}

// Evaluated top to bottom against one working string. Captures end at the first period.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use Field::*;
    vec![
        Rule::new(Corequisites, r"(?i)co-requisites?:?\s*([^.]+)", true, false),
        Rule::new(Corequisites, r"(?i)must be taken alongside:?\s*([^.]+)", true, false),
        Rule::new(Corequisites, r"(?i)concurrent enrollment:?\s*([^.]+)", true, false),
        Rule::new(Prerequisites, r"(?i)pre-requisites?:?\s*([^.]+)", false, true),
        Rule::new(Prerequisites, r"(?i)must have completed:?\s*([^.]+)", false, true),
        Rule::new(Prerequisites, r"(?i)requires:?\s*([^.]+)", false, true),
    ]
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub prerequisites: Option<String>,
    pub corequisites: Option<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.prerequisites.is_none() && self.corequisites.is_none()
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Prerequisites => &mut self.prerequisites,
            Field::Corequisites => &mut self.corequisites,
        }
    }
}

pub fn is_no_requirement(text: &str) -> bool {
    let lower = text.to_lowercase();
    NO_REQUIREMENT_PHRASES.iter().any(|p| lower.contains(p))
}

/// Split free-text requirement prose into prerequisites and corequisites.
///
/// Corequisite rules all run in order, each cutting its match out of the
/// working text, so the last corequisite rule that matches supplies the value.
/// Prerequisite rules then run against what is left and stop at the first hit.
/// If none hits, whatever text is left (minus surrounding periods) becomes
/// the prerequisites.
pub fn classify(text: Option<&str>) -> Classification {
    let Some(mut working) = normalize(text) else {
        return Classification::default();
    };
    if is_no_requirement(&working) {
        return Classification::default();
    }

    let mut result = Classification::default();
    let mut closed: Vec<Field> = Vec::new();
    let mut stripped = false;

    for rule in RULES.iter() {
        if closed.contains(&rule.field) {
            continue;
        }
        let Some(caps) = rule.pattern.captures(&working) else {
            continue;
        };

        *result.slot(rule.field) = Some(collapse(&caps[1])).filter(|v| !v.is_empty());

        if rule.strip {
            working = rule.pattern.replace_all(&working, "").into_owned();
            stripped = true;
        }
        if rule.stop {
            closed.push(rule.field);
        }
    }

    if result.prerequisites.is_none() {
        result.prerequisites = leftover(&working, stripped);
    }

    result
}

fn leftover(working: &str, stripped: bool) -> Option<String> {
    let text = collapse(working);
    if text.is_empty() || is_no_requirement(&text) {
        return None;
    }
    let trimmed = text.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.chars().any(char::is_alphanumeric) {
        return Some(trimmed.to_string());
    }
    // Punctuation left behind by a corequisite cut is not a requirement.
    (!stripped).then_some(text)
}
