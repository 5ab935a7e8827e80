use anyhow::Context;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::PeerSubmission;
use crate::trimester;

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: Uuid,
    pub student_id: String,
    pub email: String,
    pub department: String,
    pub trimester: String,
    pub last_term_gpa: f64,
    pub overall_cgpa: f64,
}

/// Reads `app_settings.active_trimester`, falling back to the calendar guess
/// when the row is missing or unreadable.
pub async fn active_trimester(pool: &PgPool) -> String {
    let row = sqlx::query("SELECT value FROM app_settings WHERE key = 'active_trimester'")
        .fetch_optional(pool)
        .await;

    match row {
        Ok(Some(row)) => match row.try_get::<String, _>("value") {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "active trimester is not text, guessing from date");
                trimester::current_trimester()
            }
        },
        Ok(None) => {
            warn!("active trimester not configured, guessing from date");
            trimester::current_trimester()
        }
        Err(err) => {
            warn!(error = %err, "failed to load active trimester, guessing from date");
            trimester::current_trimester()
        }
    }
}

/// All submissions for one department and trimester, best first. The row of
/// `exclude`, when given, is left out.
pub async fn fetch_cohort(
    pool: &PgPool,
    department: &str,
    trimester: &str,
    exclude: Option<Uuid>,
) -> anyhow::Result<Vec<PeerSubmission>> {
    let rows = sqlx::query(
        r#"
        SELECT last_trimester_gpa::float8 AS last_term_gpa,
               overall_cgpa::float8 AS overall_cgpa,
               submitted_at
        FROM scholarship_submissions
        WHERE department = $1 AND trimester = $2
          AND ($3::uuid IS NULL OR user_id <> $3)
        ORDER BY last_trimester_gpa DESC, overall_cgpa DESC, submitted_at ASC
        "#,
    )
    .bind(department)
    .bind(trimester)
    .bind(exclude)
    .fetch_all(pool)
    .await
    .context("failed to fetch scholarship submissions")?;

    let mut cohort = Vec::with_capacity(rows.len());

    for row in rows {
        cohort.push(PeerSubmission {
            last_term_gpa: row.try_get("last_term_gpa")?,
            overall_cgpa: row.try_get("overall_cgpa")?,
            submitted_at: row.try_get("submitted_at")?,
        });
    }

    debug!(department, trimester, size = cohort.len(), "cohort fetched");

    Ok(cohort)
}

/// Inserts or replaces the user's submission for the department and trimester.
pub async fn upsert_submission(
    pool: &PgPool,
    submission: &NewSubmission,
) -> anyhow::Result<PeerSubmission> {
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO scholarship_submissions
        (user_id, student_id, email, department, trimester,
         last_trimester_gpa, overall_cgpa, submitted_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        ON CONFLICT (user_id, trimester, department) DO UPDATE
        SET student_id = EXCLUDED.student_id,
            email = EXCLUDED.email,
            last_trimester_gpa = EXCLUDED.last_trimester_gpa,
            overall_cgpa = EXCLUDED.overall_cgpa,
            submitted_at = EXCLUDED.submitted_at,
            updated_at = EXCLUDED.updated_at
        RETURNING last_trimester_gpa::float8 AS last_term_gpa,
                  overall_cgpa::float8 AS overall_cgpa,
                  submitted_at
        "#,
    )
    .bind(submission.user_id)
    .bind(&submission.student_id)
    .bind(&submission.email)
    .bind(&submission.department)
    .bind(&submission.trimester)
    .bind(submission.last_term_gpa)
    .bind(submission.overall_cgpa)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("failed to store scholarship submission")?;

    Ok(PeerSubmission {
        last_term_gpa: row.try_get("last_term_gpa")?,
        overall_cgpa: row.try_get("overall_cgpa")?,
        submitted_at: row.try_get("submitted_at")?,
    })
}
