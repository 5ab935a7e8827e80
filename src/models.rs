use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grades;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    pub credits: f64,
    pub grade: String,
}

impl CourseRecord {
    pub fn new(name: impl Into<String>, credits: f64, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credits,
            grade: grade.into(),
        }
    }

    /// Always derived from the grade scale, never stored.
    pub fn grade_points(&self) -> f64 {
        grades::point_of(&self.grade)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetakeRecord {
    #[serde(default)]
    pub name: String,
    pub credits: f64,
    pub old_grade: String,
    pub new_grade: String,
}

impl RetakeRecord {
    /// Negative when the retake ends worse than the original attempt.
    pub fn improvement(&self) -> f64 {
        grades::point_of(&self.new_grade) - grades::point_of(&self.old_grade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcademicStanding {
    pub completed_credits: f64,
    pub current_cgpa: f64,
}

impl AcademicStanding {
    pub fn grade_points(&self) -> f64 {
        self.completed_credits * self.current_cgpa
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipGoal {
    pub target_cgpa: f64,
    pub total_program_credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerSubmission {
    pub last_term_gpa: f64,
    pub overall_cgpa: f64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    Beast,
    Impossible,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
            Difficulty::Beast => "beast",
            Difficulty::Impossible => "impossible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScholarshipTier {
    Full,
    Half,
    Quarter,
    NoAward,
}

impl ScholarshipTier {
    pub fn percent(self) -> u8 {
        match self {
            ScholarshipTier::Full => 100,
            ScholarshipTier::Half => 50,
            ScholarshipTier::Quarter => 25,
            ScholarshipTier::NoAward => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetakeStep {
    /// Position in processing order, not input order.
    pub after_index: usize,
    pub source_index: usize,
    pub cgpa_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationSummary {
    pub current_cgpa: f64,
    pub term_gpa: f64,
    pub potential_cgpa: f64,
    pub cgpa_change: f64,
    pub completed_credits: f64,
    pub new_course_credits: f64,
    pub total_future_credits: f64,
    pub course_count: usize,
    pub retake_count: usize,
    pub retake_improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub remaining_credits: f64,
    pub required_gpa: f64,
    pub difficulty: Difficulty,
    pub max_achievable_cgpa: f64,
    pub perfect_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RetakeVerdict {
    Reached,
    Achievable { percent_of_as_needed: f64 },
    OutOfReach,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetakeOutlook {
    pub steps: Vec<RetakeStep>,
    pub goal_reached_at: Option<usize>,
    pub cgpa_after_retakes: f64,
    pub max_achievable_cgpa: f64,
    pub verdict: RetakeVerdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CohortRank {
    pub position: usize,
    pub cohort_size: usize,
    pub percentile: f64,
    pub tier: ScholarshipTier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TierCounts {
    pub full: usize,
    pub half: usize,
    pub quarter: usize,
    pub none: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub submission_count: usize,
    pub average_last_gpa: f64,
    pub highest_last_gpa: f64,
    pub tier_counts: TierCounts,
    pub full_threshold: Option<f64>,
    pub half_threshold: Option<f64>,
    pub quarter_threshold: Option<f64>,
}
