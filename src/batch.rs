use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::browser::Fetcher;
use crate::parser::{self, Classification};
use crate::records::CourseRecord;
use crate::subject::Subject;

/// Batch stats returned after completion.
pub struct BatchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Combine a subject with its fetch outcome. A failed fetch is logged and
/// yields a record with both requirement fields empty.
/// `run` calls this inside `ProgressBar::suspend` so the log line lands cleanly.
pub fn assemble(subject: &Subject, fetched: Result<String>) -> CourseRecord {
    let classification = match fetched {
        Ok(html) => parser::process_html(&html),
        Err(e) => {
            warn!("Error scraping {} ({}): {:#}", subject.code, subject.url, e);
            Classification::default()
        }
    };
    if classification.is_empty() {
        debug!("No requirements recorded for {}", subject.code);
    }

    CourseRecord {
        subject_code: subject.code.clone(),
        prerequisites: classification.prerequisites,
        corequisites: classification.corequisites,
        details: subject.details.clone(),
    }
}

/// Fetch, classify and assemble each subject in order, one at a time.
/// Every subject produces exactly one record.
pub async fn run<F: Fetcher + ?Sized>(
    fetcher: &F,
    subjects: &[Subject],
) -> Result<(Vec<CourseRecord>, BatchStats)> {
    let total = subjects.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut records = Vec::with_capacity(total);
    let mut errors = 0usize;

    for subject in subjects {
        pb.suspend(|| println!("Scraping {}...", subject.code));

        let fetched = fetcher.fetch(&subject.url).await;
        if fetched.is_err() {
            errors += 1;
        }
        records.push(pb.suspend(|| assemble(subject, fetched)));

        pb.suspend(|| println!("Completed {}", subject.code));
        pb.inc(1);
    }

    pb.finish_and_clear();
    let ok = total - errors;
    info!("Scraped {} subjects ({} ok, {} errors)", total, ok, errors);

    Ok((records, BatchStats { total, ok, errors }))
}
