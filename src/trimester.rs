use chrono::{Datelike, NaiveDate, Utc};

/// Trimester label for a calendar date: Jan-Apr Spring, May-Aug Summer, Sep-Dec Fall.
pub fn detect_trimester(date: NaiveDate) -> String {
    let season = match date.month() {
        1..=4 => "Spring",
        5..=8 => "Summer",
        _ => "Fall",
    };

    format!("{season} {}", date.year())
}

pub fn current_trimester() -> String {
    detect_trimester(Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn months_map_to_trimesters() {
        assert_eq!(detect_trimester(date(2026, 1, 1)), "Spring 2026");
        assert_eq!(detect_trimester(date(2026, 4, 30)), "Spring 2026");
        assert_eq!(detect_trimester(date(2026, 5, 1)), "Summer 2026");
        assert_eq!(detect_trimester(date(2026, 8, 31)), "Summer 2026");
        assert_eq!(detect_trimester(date(2026, 9, 1)), "Fall 2026");
        assert_eq!(detect_trimester(date(2025, 12, 31)), "Fall 2025");
    }
}
