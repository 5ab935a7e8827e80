use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::grades;
use crate::models::{CourseRecord, PeerSubmission, RetakeRecord};

fn read_rows<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<T>().enumerate() {
        let row = result.with_context(|| format!("bad row {} in {}", line + 1, path.display()))?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "csv loaded");

    Ok(rows)
}

/// Reads `name,credits,grade` rows. Unknown grades are kept and count as F.
pub fn read_courses(path: &Path) -> anyhow::Result<Vec<CourseRecord>> {
    let courses: Vec<CourseRecord> = read_rows(path)?;

    for course in courses.iter().filter(|c| !grades::is_valid_letter(&c.grade)) {
        warn!(course = %course.name, grade = %course.grade, "unknown grade, counted as F");
    }

    Ok(courses)
}

/// Reads `name,credits,old_grade,new_grade` rows.
pub fn read_retakes(path: &Path) -> anyhow::Result<Vec<RetakeRecord>> {
    let mut retakes: Vec<RetakeRecord> = read_rows(path)?;

    for (i, retake) in retakes.iter_mut().enumerate() {
        if retake.name.is_empty() {
            retake.name = format!("Retake {}", i + 1);
        }
    }

    Ok(retakes)
}

/// Reads `last_term_gpa,overall_cgpa,submitted_at` rows, timestamps in RFC 3339.
pub fn read_cohort(path: &Path) -> anyhow::Result<Vec<PeerSubmission>> {
    read_rows(path)
}
