use serde::Serialize;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeEntry {
    pub letter: &'static str,
    pub point: f64,
    pub range: &'static str,
}

/// UIU grading table, best to worst.
pub const GRADE_SCALE: [GradeEntry; 11] = [
    GradeEntry { letter: "A", point: 4.0, range: "90-100" },
    GradeEntry { letter: "A-", point: 3.67, range: "86-89" },
    GradeEntry { letter: "B+", point: 3.33, range: "82-85" },
    GradeEntry { letter: "B", point: 3.0, range: "78-81" },
    GradeEntry { letter: "B-", point: 2.67, range: "74-77" },
    GradeEntry { letter: "C+", point: 2.33, range: "70-73" },
    GradeEntry { letter: "C", point: 2.0, range: "66-69" },
    GradeEntry { letter: "C-", point: 1.67, range: "62-65" },
    GradeEntry { letter: "D+", point: 1.33, range: "58-61" },
    GradeEntry { letter: "D", point: 1.0, range: "55-57" },
    GradeEntry { letter: "F", point: 0.0, range: "Below 55" },
];

const POINT_MATCH_TOLERANCE: f64 = 0.01;

fn entry(letter: &str) -> Option<&'static GradeEntry> {
    GRADE_SCALE.iter().find(|entry| entry.letter == letter)
}

/// Grade point for a letter. Unrecognized letters count as an F.
pub fn point_of(letter: &str) -> f64 {
    entry(letter).map(|entry| entry.point).unwrap_or(0.0)
}

pub fn is_valid_letter(letter: &str) -> bool {
    entry(letter).is_some()
}

pub fn all_letters() -> impl Iterator<Item = &'static str> {
    GRADE_SCALE.iter().map(|entry| entry.letter)
}

pub fn range_of(letter: &str) -> &'static str {
    entry(letter).map(|entry| entry.range).unwrap_or("Unknown")
}

/// Strict counterpart of [`point_of`] for callers that must reject bad input.
pub fn parse_letter(letter: &str) -> Result<&'static GradeEntry, EngineError> {
    entry(letter.trim()).ok_or_else(|| EngineError::UnknownGrade(letter.to_string()))
}

/// First letter whose point lies within 0.01 of `point`, falling back to F.
pub fn letter_for_point(point: f64) -> &'static str {
    GRADE_SCALE
        .iter()
        .find(|entry| (entry.point - point).abs() < POINT_MATCH_TOLERANCE)
        .map(|entry| entry.letter)
        .unwrap_or("F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_unique_and_non_increasing() {
        for (i, a) in GRADE_SCALE.iter().enumerate() {
            assert!((0.0..=4.0).contains(&a.point));
            for b in GRADE_SCALE.iter().skip(i + 1) {
                assert_ne!(a.letter, b.letter);
                assert!(a.point >= b.point);
            }
        }
    }

    #[test]
    fn unknown_letters_fall_back_to_zero() {
        assert_eq!(point_of("A"), 4.0);
        assert_eq!(point_of("B+"), 3.33);
        assert_eq!(point_of("E"), 0.0);
        assert_eq!(point_of(""), 0.0);
        assert!(!is_valid_letter("E"));
        assert!(is_valid_letter("D+"));
        assert_eq!(range_of("C-"), "62-65");
        assert_eq!(range_of("Z"), "Unknown");
    }

    #[test]
    fn letters_are_listed_best_first() {
        let letters: Vec<&str> = all_letters().collect();
        assert_eq!(letters.len(), 11);
        assert_eq!(letters.first(), Some(&"A"));
        assert_eq!(letters.last(), Some(&"F"));
    }

    #[test]
    fn strict_lookup_rejects_unknown_letters() {
        assert_eq!(parse_letter(" A- ").map(|e| e.point).ok(), Some(3.67));
        assert!(matches!(
            parse_letter("A+"),
            Err(EngineError::UnknownGrade(letter)) if letter == "A+"
        ));
    }

    #[test]
    fn reverse_lookup_matches_nearby_points() {
        assert_eq!(letter_for_point(3.67), "A-");
        assert_eq!(letter_for_point(3.325), "B+");
        assert_eq!(letter_for_point(1.5), "F");
    }
}
