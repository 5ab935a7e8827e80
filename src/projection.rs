use tracing::debug;

use crate::cgpa::simulate_retake_sequence;
use crate::error::EngineError;
use crate::models::{
    AcademicStanding, Difficulty, GoalPlan, RetakeOutlook, RetakeRecord, RetakeVerdict,
    ScholarshipGoal,
};

const PERFECT_GPA: f64 = 4.0;
const BASELINE_GPA: f64 = 3.0;
const BEAST_PERCENT: f64 = 90.0;
const REACHABLE_TOLERANCE: f64 = 0.005;

pub fn remaining_credits(standing: &AcademicStanding, goal: &ScholarshipGoal) -> f64 {
    goal.total_program_credits - standing.completed_credits
}

/// GPA needed on every remaining credit to finish at the target. Values above
/// 4.0 are returned as is and mean the target cannot be reached.
pub fn required_gpa(standing: &AcademicStanding, goal: &ScholarshipGoal) -> Result<f64, EngineError> {
    let remaining = remaining_credits(standing, goal);

    if remaining <= 0.0 {
        return Err(EngineError::invalid("no credits remain in the program"));
    }

    if goal.target_cgpa <= standing.current_cgpa {
        return Err(EngineError::invalid("target CGPA is not above the current CGPA"));
    }

    Ok((goal.target_cgpa * goal.total_program_credits - standing.grade_points()) / remaining)
}

pub fn classify_difficulty(required_gpa: f64, remaining_credits: f64) -> Difficulty {
    if required_gpa > PERFECT_GPA {
        Difficulty::Impossible
    } else if required_gpa >= 3.80 {
        // Share of the remaining credits that must be an A if the rest land on a B.
        let perfect_credits =
            (required_gpa - BASELINE_GPA) / (PERFECT_GPA - BASELINE_GPA) * remaining_credits;
        let percent_needed = if remaining_credits > 0.0 {
            perfect_credits / remaining_credits * 100.0
        } else {
            (required_gpa - BASELINE_GPA) / (PERFECT_GPA - BASELINE_GPA) * 100.0
        };

        if percent_needed >= BEAST_PERCENT {
            Difficulty::Beast
        } else {
            Difficulty::Hard
        }
    } else if required_gpa >= 3.50 {
        Difficulty::Hard
    } else if required_gpa >= 3.20 {
        Difficulty::Moderate
    } else {
        Difficulty::Easy
    }
}

/// CGPA at graduation with a perfect 4.00 on every remaining credit.
pub fn max_achievable_cgpa(standing: &AcademicStanding, goal: &ScholarshipGoal) -> f64 {
    max_achievable_from_points(standing.grade_points(), standing, goal)
}

fn max_achievable_from_points(
    points: f64,
    standing: &AcademicStanding,
    goal: &ScholarshipGoal,
) -> f64 {
    if goal.total_program_credits <= 0.0 {
        return 0.0;
    }

    (points + PERFECT_GPA * remaining_credits(standing, goal)) / goal.total_program_credits
}

/// Percent of the remaining credits that need an A when the others get a B.
pub fn perfect_percentage(standing: &AcademicStanding, goal: &ScholarshipGoal) -> f64 {
    let remaining = remaining_credits(standing, goal);

    if remaining <= 0.0 {
        return 0.0;
    }

    let needed = goal.target_cgpa * goal.total_program_credits - standing.grade_points();
    let perfect_credits = (needed - BASELINE_GPA * remaining) / (PERFECT_GPA - BASELINE_GPA);

    perfect_credits / remaining * 100.0
}

pub fn plan(standing: &AcademicStanding, goal: &ScholarshipGoal) -> Result<GoalPlan, EngineError> {
    let required = required_gpa(standing, goal)?;
    let remaining = remaining_credits(standing, goal);
    let difficulty = classify_difficulty(required, remaining);

    debug!(required, remaining, difficulty = difficulty.label(), "goal planned");

    Ok(GoalPlan {
        remaining_credits: remaining,
        required_gpa: required,
        difficulty,
        max_achievable_cgpa: max_achievable_cgpa(standing, goal),
        perfect_percentage: perfect_percentage(standing, goal),
    })
}

/// Replays the retakes and judges whether the goal is met, still reachable
/// with the remaining credits, or out of reach.
pub fn retake_outlook(
    standing: &AcademicStanding,
    goal: &ScholarshipGoal,
    retakes: &[RetakeRecord],
) -> Result<RetakeOutlook, EngineError> {
    required_gpa(standing, goal)?;

    let steps = simulate_retake_sequence(standing, retakes);
    let goal_reached_at = steps
        .iter()
        .position(|step| step.cgpa_after >= goal.target_cgpa);
    let cgpa_after_retakes = steps
        .last()
        .map(|step| step.cgpa_after)
        .unwrap_or(standing.current_cgpa);

    let improvement: f64 = retakes
        .iter()
        .map(|retake| retake.improvement() * retake.credits)
        .sum();
    let points = standing.grade_points() + improvement;
    let max_achievable = max_achievable_from_points(points, standing, goal);

    let verdict = if goal_reached_at.is_some() {
        RetakeVerdict::Reached
    } else if max_achievable >= goal.target_cgpa - REACHABLE_TOLERANCE {
        let needed = goal.target_cgpa * goal.total_program_credits - points;
        let remaining = remaining_credits(standing, goal);

        RetakeVerdict::Achievable {
            percent_of_as_needed: needed / (remaining * PERFECT_GPA) * 100.0,
        }
    } else {
        RetakeVerdict::OutOfReach
    };

    Ok(RetakeOutlook {
        steps,
        goal_reached_at,
        cgpa_after_retakes,
        max_achievable_cgpa: max_achievable,
        verdict,
    })
}
