use std::cmp::Ordering;

use crate::models::{CohortRank, CohortSummary, PeerSubmission, ScholarshipTier, TierCounts};

/// `Less` when `a` ranks ahead of `b`: higher last-term GPA, then higher
/// CGPA, then the earlier submission.
pub fn ranking_order(a: &PeerSubmission, b: &PeerSubmission) -> Ordering {
    b.last_term_gpa
        .total_cmp(&a.last_term_gpa)
        .then_with(|| b.overall_cgpa.total_cmp(&a.overall_cgpa))
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
}

pub fn tier_for_percentile(percentile: f64) -> ScholarshipTier {
    if percentile < 2.0 {
        ScholarshipTier::Full
    } else if percentile < 6.0 {
        ScholarshipTier::Half
    } else if percentile < 10.0 {
        ScholarshipTier::Quarter
    } else {
        ScholarshipTier::NoAward
    }
}

/// Ranks `submission` inside `cohort`, which is expected to contain it.
pub fn rank_and_tier(submission: &PeerSubmission, cohort: &[PeerSubmission]) -> CohortRank {
    let better = cohort
        .iter()
        .filter(|peer| ranking_order(peer, submission) == Ordering::Less)
        .count();
    let cohort_size = cohort.len().max(better + 1);
    let position = better + 1;

    let percentile = if position == 1 {
        if cohort_size == 1 {
            0.0
        } else {
            1.0 / cohort_size as f64 * 100.0
        }
    } else {
        better as f64 / cohort_size as f64 * 100.0
    };

    CohortRank {
        position,
        cohort_size,
        percentile,
        tier: tier_for_percentile(percentile),
    }
}

// ceil(n * percent / 100) and floor(n * percent / 100) without float drift
fn ceil_share(n: usize, percent: usize) -> usize {
    (n * percent + 99) / 100
}

fn floor_share(n: usize, percent: usize) -> usize {
    n * percent / 100
}

pub fn summarize_cohort(cohort: &[PeerSubmission]) -> CohortSummary {
    let n = cohort.len();

    let mut ranked = cohort.to_vec();
    ranked.sort_by(ranking_order);

    let threshold = |percent: usize| {
        let index = floor_share(n, percent).saturating_sub(1);
        ranked.get(index).map(|peer| peer.last_term_gpa)
    };

    let full = ceil_share(n, 2);
    let half = ceil_share(n, 4);
    let quarter = ceil_share(n, 4);

    let (average_last_gpa, highest_last_gpa) = if n == 0 {
        (0.0, 0.0)
    } else {
        let total: f64 = cohort.iter().map(|peer| peer.last_term_gpa).sum();
        let highest = cohort
            .iter()
            .map(|peer| peer.last_term_gpa)
            .fold(f64::MIN, f64::max);

        (total / n as f64, highest)
    };

    CohortSummary {
        submission_count: n,
        average_last_gpa,
        highest_last_gpa,
        tier_counts: TierCounts {
            full,
            half,
            quarter,
            none: n.saturating_sub(full + half + quarter),
        },
        full_threshold: threshold(2),
        half_threshold: threshold(6),
        quarter_threshold: threshold(10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn submission(last_term_gpa: f64, overall_cgpa: f64, minutes: i64) -> PeerSubmission {
        PeerSubmission {
            last_term_gpa,
            overall_cgpa,
            submitted_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    fn spaced_cohort(size: usize) -> Vec<PeerSubmission> {
        (0..size)
            .map(|i| submission(4.0 - i as f64 * 0.03, 3.5, i as i64))
            .collect()
    }

    #[test]
    fn top_and_bottom_of_hundred() {
        let cohort = spaced_cohort(100);

        let top = rank_and_tier(&cohort[0], &cohort);
        assert_eq!(top.position, 1);
        assert!((top.percentile - 1.0).abs() < 1e-9);
        assert_eq!(top.tier, ScholarshipTier::Full);
        assert_eq!(top.tier.percent(), 100);

        let bottom = rank_and_tier(&cohort[99], &cohort);
        assert_eq!(bottom.position, 100);
        assert!((bottom.percentile - 99.0).abs() < 1e-9);
        assert_eq!(bottom.tier, ScholarshipTier::NoAward);
    }

    #[test]
    fn middle_bands_map_to_partial_awards() {
        let cohort = spaced_cohort(100);
        assert_eq!(rank_and_tier(&cohort[3], &cohort).tier, ScholarshipTier::Half);
        assert_eq!(rank_and_tier(&cohort[7], &cohort).tier, ScholarshipTier::Quarter);
        assert_eq!(rank_and_tier(&cohort[10], &cohort).tier, ScholarshipTier::NoAward);
    }

    #[test]
    fn lone_submission_reports_zero_percentile() {
        let only = submission(3.1, 3.0, 0);
        let rank = rank_and_tier(&only, std::slice::from_ref(&only));
        assert_eq!(rank.position, 1);
        assert_eq!(rank.percentile, 0.0);
        assert_eq!(rank.tier, ScholarshipTier::Full);
    }

    #[test]
    fn ties_break_on_cgpa_then_submission_time() {
        let early = submission(3.8, 3.6, 0);
        let late = submission(3.8, 3.6, 5);
        let stronger_cgpa = submission(3.8, 3.9, 10);
        let cohort = vec![late.clone(), stronger_cgpa.clone(), early.clone()];

        assert_eq!(rank_and_tier(&stronger_cgpa, &cohort).position, 1);
        assert_eq!(rank_and_tier(&early, &cohort).position, 2);
        assert_eq!(rank_and_tier(&late, &cohort).position, 3);
    }

    #[test]
    fn summary_counts_seats_and_thresholds() {
        let cohort = spaced_cohort(100);
        let summary = summarize_cohort(&cohort);

        assert_eq!(summary.submission_count, 100);
        assert_eq!(summary.tier_counts.full, 2);
        assert_eq!(summary.tier_counts.half, 4);
        assert_eq!(summary.tier_counts.quarter, 4);
        assert_eq!(summary.tier_counts.none, 90);
        assert_eq!(summary.full_threshold, Some(cohort[1].last_term_gpa));
        assert_eq!(summary.half_threshold, Some(cohort[5].last_term_gpa));
        assert_eq!(summary.quarter_threshold, Some(cohort[9].last_term_gpa));
        assert!((summary.highest_last_gpa - 4.0).abs() < 1e-9);
    }

    #[test]
    fn small_cohorts_round_seats_up() {
        let cohort = spaced_cohort(3);
        let summary = summarize_cohort(&cohort);

        assert_eq!(summary.tier_counts.full, 1);
        assert_eq!(summary.tier_counts.half, 1);
        assert_eq!(summary.tier_counts.quarter, 1);
        assert_eq!(summary.tier_counts.none, 0);
        assert_eq!(summary.full_threshold, Some(cohort[0].last_term_gpa));

        let empty = summarize_cohort(&[]);
        assert_eq!(empty.submission_count, 0);
        assert_eq!(empty.average_last_gpa, 0.0);
        assert_eq!(empty.full_threshold, None);
    }
}
