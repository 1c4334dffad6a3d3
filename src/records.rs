use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::subject::{Subject, SubjectDetails};

const CODE_COL: &str = "SUBJECT CODE";
const DETAIL_COLS: &[&str] = &["SUBJECT NAME", "CATEGORY", "YEAR"];

const STANDALONE_HEADER: &[&str] = &["subject_code", "prerequisites", "corequisites"];
const MERGE_HEADER: &[&str] = &[
    "SUBJECT CODE",
    "SUBJECT NAME",
    "CATEGORY",
    "YEAR",
    "prerequisites",
    "corequisites",
];

/// Output layout, chosen from the input header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `subject_code, prerequisites, corequisites`
    Standalone,
    /// Input catalog columns followed by the two requirement columns.
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub subject_code: String,
    pub prerequisites: Option<String>,
    pub corequisites: Option<String>,
    pub details: Option<SubjectDetails>,
}

pub struct SubjectList {
    pub mode: Mode,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(rename = "SUBJECT CODE")]
    code: String,
    #[serde(rename = "SUBJECT NAME", default)]
    name: Option<String>,
    #[serde(rename = "CATEGORY", default)]
    category: Option<String>,
    #[serde(rename = "YEAR", default)]
    year: Option<String>,
}

#[derive(Serialize)]
struct StandaloneRow<'a> {
    subject_code: &'a str,
    prerequisites: Option<&'a str>,
    corequisites: Option<&'a str>,
}

#[derive(Serialize)]
struct MergedRow<'a> {
    code: &'a str,
    name: Option<&'a str>,
    category: Option<&'a str>,
    year: Option<&'a str>,
    prerequisites: Option<&'a str>,
    corequisites: Option<&'a str>,
}

/// Read the subject list. Columns are matched by header name, in any order.
pub fn read_subjects(path: &Path, config: &Config) -> Result<SubjectList> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == CODE_COL) {
        bail!("{} has no {:?} column", path.display(), CODE_COL);
    }
    let mode = if headers.iter().any(|h| DETAIL_COLS.contains(&h)) {
        Mode::Merge
    } else {
        Mode::Standalone
    };

    let mut subjects = Vec::new();
    for (i, row) in reader.deserialize::<InputRow>().enumerate() {
        let row = row.with_context(|| format!("Bad row {} in {}", i + 2, path.display()))?;
        let year = row
            .year
            .as_deref()
            .filter(|y| !y.trim().is_empty())
            .unwrap_or(config.year.as_str())
            .to_string();
        let details = (mode == Mode::Merge).then(|| SubjectDetails {
            name: row.name.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            year: row.year.unwrap_or_default(),
        });
        subjects.push(Subject::new(&config.base_url, &year, &row.code, details));
    }

    Ok(SubjectList { mode, subjects })
}

/// Rewrite `path` with one row per record. Absent values become empty fields.
pub fn write_records(path: &Path, mode: Mode, records: &[CourseRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    match mode {
        Mode::Standalone => {
            writer.write_record(STANDALONE_HEADER)?;
            for r in records {
                writer.serialize(StandaloneRow {
                    subject_code: &r.subject_code,
                    prerequisites: r.prerequisites.as_deref(),
                    corequisites: r.corequisites.as_deref(),
                })?;
            }
        }
        Mode::Merge => {
            writer.write_record(MERGE_HEADER)?;
            for r in records {
                let d = r.details.as_ref();
                writer.serialize(MergedRow {
                    code: &r.subject_code,
                    name: d.map(|d| d.name.as_str()),
                    category: d.map(|d| d.category.as_str()),
                    year: d.map(|d| d.year.as_str()),
                    prerequisites: r.prerequisites.as_deref(),
                    corequisites: r.corequisites.as_deref(),
                })?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, pre: Option<&str>, co: Option<&str>) -> CourseRecord {
        CourseRecord {
            subject_code: code.to_string(),
            prerequisites: pre.map(str::to_string),
            corequisites: co.map(str::to_string),
            details: None,
        }
    }

    #[test]
    fn merge_input_any_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subjects.csv");
        std::fs::write(
            &path,
            "YEAR,CATEGORY,SUBJECT CODE,SUBJECT NAME\n\
             2024, Core , CSIT321 ,Project\n\
             ,Elective,CSIT314,Software Development Methodologies\n",
        )
        .unwrap();

        let list = read_subjects(&path, &Config::default()).unwrap();
        assert_eq!(list.mode, Mode::Merge);
        assert_eq!(list.subjects.len(), 2);

        let first = &list.subjects[0];
        assert_eq!(first.code, "CSIT321");
        assert_eq!(first.url, "https://courses.uow.edu.au/subjects/2024/CSIT321");
        // catalog columns are copied untrimmed
        assert_eq!(first.details.as_ref().unwrap().category, " Core ");

        // blank YEAR falls back to the configured year but is copied through as-is
        let second = &list.subjects[1];
        assert_eq!(second.url, "https://courses.uow.edu.au/subjects/2025/CSIT314");
        assert_eq!(second.details.as_ref().unwrap().year, "");
    }

    #[test]
    fn code_only_input_is_standalone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        std::fs::write(&path, "SUBJECT CODE\nCSIT321\nCSIT226\n").unwrap();

        let list = read_subjects(&path, &Config::default()).unwrap();
        assert_eq!(list.mode, Mode::Standalone);
        assert!(list.subjects.iter().all(|s| s.details.is_none()));
    }

    #[test]
    fn missing_code_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "CODE,NAME\nCSIT321,Project\n").unwrap();
        assert!(read_subjects(&path, &Config::default()).is_err());
    }

    #[test]
    fn standalone_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![
            record("CSIT321", Some("CSIT214 and CSIT226"), Some("CSIT314")),
            record("CSIT999", None, None),
        ];
        write_records(&path, Mode::Standalone, &records).unwrap();

        let out = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            out,
            "subject_code,prerequisites,corequisites\n\
             CSIT321,CSIT214 and CSIT226,CSIT314\n\
             CSIT999,,\n"
        );
    }

    #[test]
    fn merge_output_quotes_commas_and_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut r = record("CSIT314", Some("CSIT121, CSIT131"), None);
        r.details = Some(SubjectDetails {
            name: "Software Development Methodologies".into(),
            category: "Core".into(),
            year: "2025".into(),
        });
        write_records(&path, Mode::Merge, &[r]).unwrap();

        let out = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            out,
            "SUBJECT CODE,SUBJECT NAME,CATEGORY,YEAR,prerequisites,corequisites\n\
             CSIT314,Software Development Methodologies,Core,2025,\"CSIT121, CSIT131\",\n"
        );
    }

    #[test]
    fn empty_run_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&path, Mode::Standalone, &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "subject_code,prerequisites,corequisites\n"
        );
    }
}
