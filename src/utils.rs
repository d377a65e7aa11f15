// Utility functions
use crate::model::Period;
use chrono::Local;

/// The current calendar month in local time.
pub fn current_period() -> Period {
    Period::from_date(Local::now().date_naive())
}

/// `count` months ending at `anchor`, newest first.
pub fn recent_periods(anchor: Period, count: usize) -> Vec<Period> {
    std::iter::successors(Some(anchor), |p| Some(p.previous()))
        .take(count)
        .collect()
}
