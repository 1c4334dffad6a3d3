use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_BASE_URL: &str = "https://courses.uow.edu.au/subjects";
const DEFAULT_YEAR: &str = "2025";
const DEFAULT_OUTPUT: &str = "course_requirements.csv";
const DEFAULT_SETTLE_MS: u64 = 2000;
const DEFAULT_WAIT_MS: u64 = 30_000;

/// Runtime settings, read from `COURSE_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Catalog year for rows that carry none.
    pub year: String,
    pub output: PathBuf,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    /// Pause after expanding the accordion so its content renders.
    pub settle: Duration,
    pub wait_timeout: Duration,
    pub chromium_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            year: DEFAULT_YEAR.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            browser: BrowserConfig {
                headless: true,
                settle: Duration::from_millis(DEFAULT_SETTLE_MS),
                wait_timeout: Duration::from_millis(DEFAULT_WAIT_MS),
                chromium_path: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Config::default();

        if let Some(v) = get("COURSE_BASE_URL") {
            cfg.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("COURSE_YEAR") {
            cfg.year = v;
        }
        if let Some(v) = get("COURSE_OUTPUT") {
            cfg.output = PathBuf::from(v);
        }
        if let Some(v) = get("COURSE_HEADLESS") {
            cfg.browser.headless = parse_bool(&v).context("COURSE_HEADLESS")?;
        }
        if let Some(v) = get("COURSE_SETTLE_MS") {
            cfg.browser.settle = parse_millis(&v).context("COURSE_SETTLE_MS")?;
        }
        if let Some(v) = get("COURSE_WAIT_MS") {
            cfg.browser.wait_timeout = parse_millis(&v).context("COURSE_WAIT_MS")?;
        }
        cfg.browser.chromium_path = get("CHROMIUM_PATH").map(PathBuf::from);

        Ok(cfg)
    }
}

fn parse_bool(v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

fn parse_millis(v: &str) -> Result<Duration> {
    let ms: u64 = v
        .trim()
        .parse()
        .with_context(|| format!("expected milliseconds, got {:?}", v))?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.base_url, "https://courses.uow.edu.au/subjects");
        assert_eq!(cfg.year, "2025");
        assert_eq!(cfg.output, PathBuf::from("course_requirements.csv"));
        assert!(cfg.browser.headless);
        assert_eq!(cfg.browser.settle, Duration::from_secs(2));
    }

    #[test]
    fn overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("COURSE_BASE_URL", "http://localhost:8080/subjects/"),
            ("COURSE_YEAR", "2026"),
            ("COURSE_HEADLESS", "false"),
            ("COURSE_SETTLE_MS", "250"),
            ("CHROMIUM_PATH", "/usr/bin/chromium"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8080/subjects");
        assert_eq!(cfg.year, "2026");
        assert!(!cfg.browser.headless);
        assert_eq!(cfg.browser.settle, Duration::from_millis(250));
        assert_eq!(cfg.browser.chromium_path, Some(PathBuf::from("/usr/bin/chromium")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[("COURSE_WAIT_MS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("COURSE_HEADLESS", "maybe")])).is_err());
    }
}
