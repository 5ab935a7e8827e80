use std::fmt::Write;

use crate::grades;
use crate::models::{
    AcademicStanding, CohortRank, CohortSummary, GoalPlan, RetakeOutlook, RetakeRecord,
    RetakeVerdict, ScholarshipGoal,
};

pub fn build_goal_report(
    standing: &AcademicStanding,
    goal: &ScholarshipGoal,
    plan: &GoalPlan,
    retakes: &[RetakeRecord],
    outlook: Option<&RetakeOutlook>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# CGPA Goal Plan");
    let _ = writeln!(
        output,
        "From {:.2} over {} credits to {:.2} over {} credits",
        standing.current_cgpa,
        standing.completed_credits,
        goal.target_cgpa,
        goal.total_program_credits
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Requirement");
    let _ = writeln!(output, "- Remaining credits: {:.1}", plan.remaining_credits);
    let _ = writeln!(output, "- Required GPA: {:.2}", plan.required_gpa);
    let _ = writeln!(output, "- Difficulty: {}", plan.difficulty.label());
    let _ = writeln!(
        output,
        "- Maximum achievable CGPA: {:.2}",
        plan.max_achievable_cgpa
    );

    if plan.perfect_percentage > 0.0 {
        let _ = writeln!(
            output,
            "- A grades needed (rest at B): {:.0}% of remaining credits",
            plan.perfect_percentage.min(100.0)
        );
    }

    let Some(outlook) = outlook else {
        return output;
    };

    let _ = writeln!(output);
    let _ = writeln!(output, "## Retake Simulation");

    if outlook.steps.is_empty() {
        let _ = writeln!(output, "No retakes entered.");
    }

    for step in outlook.steps.iter() {
        let Some(retake) = retakes.get(step.source_index) else {
            continue;
        };
        let marker = if step.cgpa_after >= goal.target_cgpa {
            "target reached"
        } else {
            "below target"
        };

        let _ = writeln!(
            output,
            "- After retake {}: {} ({} {:.2} -> {} {:.2}, {} credits) CGPA {:.2}, {}",
            step.after_index + 1,
            retake.name,
            retake.old_grade,
            grades::point_of(&retake.old_grade),
            retake.new_grade,
            grades::point_of(&retake.new_grade),
            retake.credits,
            step.cgpa_after,
            marker
        );
    }

    let _ = writeln!(output);

    match &outlook.verdict {
        RetakeVerdict::Reached => {
            let _ = writeln!(
                output,
                "Target reached with retakes alone (CGPA {:.2}).",
                outlook.cgpa_after_retakes
            );
        }
        RetakeVerdict::Achievable {
            percent_of_as_needed,
        } => {
            let _ = writeln!(
                output,
                "Achievable: about {:.0}% A grades needed in the remaining {:.1} credits (max {:.2}).",
                percent_of_as_needed, plan.remaining_credits, outlook.max_achievable_cgpa
            );
        }
        RetakeVerdict::OutOfReach => {
            let _ = writeln!(
                output,
                "Out of reach: the best possible CGPA is {:.2}. Consider more retakes or a target of {:.2}.",
                outlook.max_achievable_cgpa, outlook.max_achievable_cgpa
            );
        }
    }

    output
}

fn rank_label(rank: &CohortRank) -> String {
    if rank.percentile == 0.0 {
        "Top Student".to_string()
    } else if rank.percentile < 1.0 {
        format!("Top {:.2}%", rank.percentile)
    } else {
        format!("Top {:.1}%", rank.percentile)
    }
}

pub fn build_scholarship_report(
    department: &str,
    trimester: &str,
    rank: &CohortRank,
    summary: &CohortSummary,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Scholarship Estimate");
    let _ = writeln!(
        output,
        "{} {} ({} submissions)",
        department, trimester, summary.submission_count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Your Standing");
    let _ = writeln!(
        output,
        "- {}: #{} out of {}",
        rank_label(rank),
        rank.position,
        rank.cohort_size
    );

    match rank.tier.percent() {
        0 => {
            let _ = writeln!(output, "- No Scholarship");
        }
        percent => {
            let _ = writeln!(output, "- Scholarship: {percent}%");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Cohort");
    let _ = writeln!(
        output,
        "- Average last GPA {:.2}, highest {:.2}",
        summary.average_last_gpa, summary.highest_last_gpa
    );

    let tiers = [
        (100, summary.tier_counts.full, summary.full_threshold),
        (50, summary.tier_counts.half, summary.half_threshold),
        (25, summary.tier_counts.quarter, summary.quarter_threshold),
    ];

    for (percent, seats, threshold) in tiers {
        match threshold {
            Some(gpa) => {
                let _ = writeln!(
                    output,
                    "- {percent}% tier: {seats} seats, last GPA >= {gpa:.2}"
                );
            }
            None => {
                let _ = writeln!(output, "- {percent}% tier: {seats} seats");
            }
        }
    }

    let _ = writeln!(
        output,
        "- No scholarship: {} students",
        summary.tier_counts.none
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort;
    use crate::models::PeerSubmission;
    use crate::projection;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn goal_report_lists_retakes_in_processing_order() {
        let standing = AcademicStanding {
            completed_credits: 90.0,
            current_cgpa: 3.4,
        };
        let goal = ScholarshipGoal {
            target_cgpa: 3.6,
            total_program_credits: 140.0,
        };
        let retakes = vec![
            RetakeRecord {
                name: "English".to_string(),
                credits: 3.0,
                old_grade: "B".to_string(),
                new_grade: "A".to_string(),
            },
            RetakeRecord {
                name: "Physics".to_string(),
                credits: 3.0,
                old_grade: "D".to_string(),
                new_grade: "A".to_string(),
            },
        ];

        let plan = projection::plan(&standing, &goal).unwrap();
        let outlook = projection::retake_outlook(&standing, &goal, &retakes).unwrap();
        let report = build_goal_report(&standing, &goal, &plan, &retakes, Some(&outlook));

        assert!(report.contains("Required GPA: 3.96"));
        assert!(report.contains("Difficulty: beast"));

        let physics = report.find("After retake 1: Physics").unwrap();
        let english = report.find("After retake 2: English").unwrap();
        assert!(physics < english);
    }

    #[test]
    fn scholarship_report_shows_tier_and_thresholds() {
        let start = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();
        let cohort: Vec<PeerSubmission> = (0..50)
            .map(|i| PeerSubmission {
                last_term_gpa: 4.0 - i as f64 * 0.02,
                overall_cgpa: 3.5,
                submitted_at: start + Duration::minutes(i),
            })
            .collect();

        let rank = cohort::rank_and_tier(&cohort[0], &cohort);
        let summary = cohort::summarize_cohort(&cohort);
        let report = build_scholarship_report("CSE", "Spring 2026", &rank, &summary);

        assert!(report.contains("Top 2.0%: #1 out of 50"));
        assert!(report.contains("Scholarship: 50%"));
        assert!(report.contains("100% tier: 1 seats, last GPA >= 4.00"));
    }
}
