use tracing::trace;

use crate::grades;
use crate::models::{AcademicStanding, CalculationSummary, CourseRecord, RetakeRecord, RetakeStep};

fn totals(courses: &[CourseRecord]) -> (f64, f64) {
    courses.iter().fold((0.0, 0.0), |(points, credits), course| {
        (
            points + course.grade_points() * course.credits,
            credits + course.credits,
        )
    })
}

fn ratio(points: f64, credits: f64) -> f64 {
    if credits > 0.0 {
        points / credits
    } else {
        0.0
    }
}

/// Credit-weighted average of the given courses, 0 when there are no credits.
pub fn term_gpa(courses: &[CourseRecord]) -> f64 {
    let (points, credits) = totals(courses);
    ratio(points, credits)
}

/// CGPA over prior and new courses when both are known course by course.
pub fn cumulative_cgpa(prior: &[CourseRecord], courses: &[CourseRecord]) -> f64 {
    let (prior_points, prior_credits) = totals(prior);
    let (points, credits) = totals(courses);
    ratio(prior_points + points, prior_credits + credits)
}

/// CGPA when the prior record is only known as credits and CGPA.
pub fn cumulative_cgpa_with_standing(standing: &AcademicStanding, courses: &[CourseRecord]) -> f64 {
    let (points, credits) = totals(courses);
    ratio(
        standing.grade_points() + points,
        standing.completed_credits + credits,
    )
}

pub fn potential_cgpa(standing: &AcademicStanding, new_courses: &[CourseRecord]) -> f64 {
    cumulative_cgpa_with_standing(standing, new_courses)
}

/// Returns a copy of `courses` with the first course named `course_name` regraded.
/// Unknown course names leave the list untouched.
pub fn apply_retake(
    courses: &[CourseRecord],
    course_name: &str,
    new_grade: &str,
) -> Vec<CourseRecord> {
    let mut updated = courses.to_vec();

    if let Some(course) = updated.iter_mut().find(|course| course.name == course_name) {
        course.grade = new_grade.to_string();
    } else {
        trace!(course_name, "retake target not in course list");
    }

    updated
}

/// Replays retakes worst original grade first. Credits stay fixed, only the
/// grade points move.
pub fn simulate_retake_sequence(
    standing: &AcademicStanding,
    retakes: &[RetakeRecord],
) -> Vec<RetakeStep> {
    let mut order: Vec<(usize, &RetakeRecord)> = retakes.iter().enumerate().collect();
    order.sort_by(|(_, a), (_, b)| {
        grades::point_of(&a.old_grade).total_cmp(&grades::point_of(&b.old_grade))
    });

    let base_points = standing.grade_points();
    let mut improvement = 0.0;

    order
        .into_iter()
        .enumerate()
        .map(|(after_index, (source_index, retake))| {
            improvement += retake.improvement() * retake.credits;

            RetakeStep {
                after_index,
                source_index,
                cgpa_after: ratio(base_points + improvement, standing.completed_credits),
            }
        })
        .collect()
}

/// Everything the calculator page shows after "Calculate".
pub fn summarize(
    standing: &AcademicStanding,
    new_courses: &[CourseRecord],
    retakes: &[RetakeRecord],
) -> CalculationSummary {
    let (new_points, new_credits) = totals(new_courses);
    let retake_improvement: f64 = retakes
        .iter()
        .map(|retake| retake.improvement() * retake.credits)
        .sum();

    let total_future_credits = standing.completed_credits + new_credits;
    let potential = ratio(
        standing.grade_points() + new_points + retake_improvement,
        total_future_credits,
    );

    CalculationSummary {
        current_cgpa: standing.current_cgpa,
        term_gpa: term_gpa(new_courses),
        potential_cgpa: potential,
        cgpa_change: potential - standing.current_cgpa,
        completed_credits: standing.completed_credits,
        new_course_credits: new_credits,
        total_future_credits,
        course_count: new_courses.len(),
        retake_count: retakes.len(),
        retake_improvement,
    }
}
