use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::error;

use crate::models::{AcademicStanding, CourseRecord, RetakeRecord, ScholarshipGoal};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid current CGPA (0-4)")]
    CurrentCgpa,
    #[error("Please enter valid completed credits")]
    CompletedCredits,
    #[error("Please enter a valid target CGPA (0-4)")]
    TargetCgpa,
    #[error("Please enter valid credits for course {0}")]
    CourseCredits(usize),
    #[error("Please enter valid credits for retake {0}")]
    RetakeCredits(usize),
    #[error("Please enter valid total program credits")]
    TotalCredits,
    #[error("Completed credits cannot exceed or equal total credits for your department")]
    CreditsExhausted,
    #[error("Target CGPA must be higher than current CGPA")]
    TargetNotAbove,
    #[error("Please select a department")]
    Department,
    #[error("Active trimester not loaded")]
    Trimester,
    #[error("Please enter a valid last trimester GPA (0-4)")]
    LastTermGpa,
    #[error("Please enter a valid CGPA (0-4)")]
    OverallCgpa,
    #[error("Please enter a valid UIU email address")]
    Email,
    #[error("Please enter a valid Student ID (9-10 digits)")]
    StudentId,
}

fn in_scale(value: f64) -> bool {
    (0.0..=4.0).contains(&value)
}

fn positive_credits(credits: f64) -> bool {
    credits.is_finite() && credits > 0.0
}

/// Checks the standing fed to the calculator. Zero completed credits is a
/// first trimester and is accepted.
pub fn standing(standing: &AcademicStanding) -> Result<(), ValidationError> {
    if !in_scale(standing.current_cgpa) {
        return Err(ValidationError::CurrentCgpa);
    }

    if !(standing.completed_credits.is_finite() && standing.completed_credits >= 0.0) {
        return Err(ValidationError::CompletedCredits);
    }

    Ok(())
}

/// Rejects the first course without positive credits. Rows are numbered from 1.
pub fn course_rows(courses: &[CourseRecord]) -> Result<(), ValidationError> {
    match courses.iter().position(|course| !positive_credits(course.credits)) {
        Some(i) => Err(ValidationError::CourseCredits(i + 1)),
        None => Ok(()),
    }
}

pub fn retake_rows(retakes: &[RetakeRecord]) -> Result<(), ValidationError> {
    match retakes.iter().position(|retake| !positive_credits(retake.credits)) {
        Some(i) => Err(ValidationError::RetakeCredits(i + 1)),
        None => Ok(()),
    }
}

/// Checks a goal-planner request before it reaches the projection engine.
pub fn goal_request(
    standing: &AcademicStanding,
    goal: &ScholarshipGoal,
) -> Result<(), ValidationError> {
    if !in_scale(standing.current_cgpa) {
        return Err(ValidationError::CurrentCgpa);
    }

    if standing.completed_credits.is_nan() || standing.completed_credits <= 0.0 {
        return Err(ValidationError::CompletedCredits);
    }

    if !in_scale(goal.target_cgpa) {
        return Err(ValidationError::TargetCgpa);
    }

    if goal.total_program_credits.is_nan() || goal.total_program_credits <= 0.0 {
        return Err(ValidationError::TotalCredits);
    }

    if standing.completed_credits >= goal.total_program_credits {
        return Err(ValidationError::CreditsExhausted);
    }

    if goal.target_cgpa <= standing.current_cgpa {
        return Err(ValidationError::TargetNotAbove);
    }

    Ok(())
}

/// Checks a scholarship submission. A GPA of exactly zero is rejected.
pub fn gpa_submission(
    department: &str,
    trimester: &str,
    last_term_gpa: f64,
    overall_cgpa: f64,
) -> Result<(), ValidationError> {
    if department.trim().is_empty() {
        return Err(ValidationError::Department);
    }

    if trimester.trim().is_empty() {
        return Err(ValidationError::Trimester);
    }

    if !(last_term_gpa > 0.0 && last_term_gpa <= 4.0) {
        return Err(ValidationError::LastTermGpa);
    }

    if !(overall_cgpa > 0.0 && overall_cgpa <= 4.0) {
        return Err(ValidationError::OverallCgpa);
    }

    Ok(())
}

const EMAIL_PATTERN: &str = r"(?i)^[^\s@]+@([a-z]+\.)?uiu\.ac\.bd$";

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();

    EMAIL
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                error!(error = %err, "email pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Any `uiu.ac.bd` address. Without a usable pattern every address is rejected.
pub fn email(address: &str) -> Result<(), ValidationError> {
    match email_pattern() {
        Some(pattern) if pattern.is_match(address) => Ok(()),
        _ => Err(ValidationError::Email),
    }
}

/// Accepts 9 or 10 digits. Dashes and other separators are ignored.
pub fn student_id(id: &str) -> Result<(), ValidationError> {
    match id.chars().filter(char::is_ascii_digit).count() {
        9 | 10 => Ok(()),
        _ => Err(ValidationError::StudentId),
    }
}

/// Formats raw input as `XXX-XXX-XXX[X]`.
pub fn format_student_id(raw: &str) -> String {
    let mut value: String = raw.chars().filter(char::is_ascii_digit).collect();

    if value.len() > 3 {
        value.insert(3, '-');
    }

    if value.len() > 7 {
        value.insert(7, '-');
    }

    value.truncate(12);

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing_of(completed_credits: f64, current_cgpa: f64) -> AcademicStanding {
        AcademicStanding {
            completed_credits,
            current_cgpa,
        }
    }

    fn goal(target_cgpa: f64, total_program_credits: f64) -> ScholarshipGoal {
        ScholarshipGoal {
            target_cgpa,
            total_program_credits,
        }
    }

    #[test]
    fn goal_requests_are_checked_in_order() {
        assert_eq!(goal_request(&standing_of(90.0, 3.4), &goal(3.6, 140.0)), Ok(()));
        assert_eq!(
            goal_request(&standing_of(90.0, 4.2), &goal(3.6, 140.0)),
            Err(ValidationError::CurrentCgpa)
        );
        assert_eq!(
            goal_request(&standing_of(0.0, 3.0), &goal(3.6, 140.0)),
            Err(ValidationError::CompletedCredits)
        );
        assert_eq!(
            goal_request(&standing_of(90.0, 3.0), &goal(f64::NAN, 140.0)),
            Err(ValidationError::TargetCgpa)
        );
        assert_eq!(
            goal_request(&standing_of(140.0, 3.0), &goal(3.6, 140.0)),
            Err(ValidationError::CreditsExhausted)
        );
        assert_eq!(
            goal_request(&standing_of(90.0, 3.6), &goal(3.6, 140.0)),
            Err(ValidationError::TargetNotAbove)
        );
    }

    fn course(credits: f64) -> CourseRecord {
        CourseRecord::new("CSE 1111", credits, "A")
    }

    #[test]
    fn standings_need_scale_cgpa_and_non_negative_credits() {
        assert_eq!(standing(&standing_of(0.0, 0.0)), Ok(()));
        assert_eq!(standing(&standing_of(90.0, 4.0)), Ok(()));
        assert_eq!(
            standing(&standing_of(0.0, 9.0)),
            Err(ValidationError::CurrentCgpa)
        );
        assert_eq!(
            standing(&standing_of(-3.0, 3.0)),
            Err(ValidationError::CompletedCredits)
        );
        assert_eq!(
            standing(&standing_of(f64::NAN, 3.0)),
            Err(ValidationError::CompletedCredits)
        );
    }

    #[test]
    fn course_rows_need_positive_credits() {
        assert_eq!(course_rows(&[]), Ok(()));
        assert_eq!(course_rows(&[course(3.0), course(1.5)]), Ok(()));
        assert_eq!(
            course_rows(&[course(3.0), course(-3.0)]),
            Err(ValidationError::CourseCredits(2))
        );
        assert_eq!(
            course_rows(&[course(0.0)]),
            Err(ValidationError::CourseCredits(1))
        );
        assert_eq!(
            course_rows(&[course(f64::INFINITY)]),
            Err(ValidationError::CourseCredits(1))
        );

        let retakes = [RetakeRecord {
            name: "Physics".to_string(),
            credits: 0.0,
            old_grade: "D".to_string(),
            new_grade: "A".to_string(),
        }];
        assert_eq!(retake_rows(&retakes), Err(ValidationError::RetakeCredits(1)));
    }

    #[test]
    fn gpa_submissions_reject_zero_and_out_of_scale() {
        assert_eq!(gpa_submission("CSE", "Spring 2026", 3.8, 3.6), Ok(()));
        assert_eq!(
            gpa_submission(" ", "Spring 2026", 3.8, 3.6),
            Err(ValidationError::Department)
        );
        assert_eq!(
            gpa_submission("CSE", "Spring 2026", 0.0, 3.6),
            Err(ValidationError::LastTermGpa)
        );
        assert_eq!(
            gpa_submission("CSE", "Spring 2026", 3.8, 4.01),
            Err(ValidationError::OverallCgpa)
        );
    }

    #[test]
    fn emails_must_be_uiu_addresses() {
        assert!(email_pattern().is_some());
        assert!(email("student@uiu.ac.bd").is_ok());
        assert!(email("someone@bscse.uiu.ac.bd").is_ok());
        assert!(email("Someone@MBA.UIU.AC.BD").is_ok());
        assert!(email("someone@gmail.com").is_err());
        assert!(email("some one@uiu.ac.bd").is_err());
        assert!(email("x@a.b.uiu.ac.bd").is_err());
    }

    #[test]
    fn student_ids_need_nine_or_ten_digits() {
        assert!(student_id("011-221-045").is_ok());
        assert!(student_id("0112210451").is_ok());
        assert!(student_id("011-221-04").is_err());
        assert!(student_id("011-221-04512").is_err());
    }

    #[test]
    fn student_ids_are_dashed_while_typing() {
        assert_eq!(format_student_id("011"), "011");
        assert_eq!(format_student_id("0112"), "011-2");
        assert_eq!(format_student_id("011221045"), "011-221-045");
        assert_eq!(format_student_id("01122104512345"), "011-221-0451");
        assert_eq!(format_student_id("011 221 045"), "011-221-045");
    }
}
