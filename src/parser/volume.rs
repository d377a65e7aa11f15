use crate::model::CellValue;
use std::num::NonZeroU64;

pub const DEFAULT_UNIT_SCALE: u32 = 1;

/// Converts a raw cell into a sales volume.
///
/// Missing, non-numeric and non-finite cells are absent, never zero. The value
/// is multiplied by `unit_scale` in floating point and the product truncated,
/// the same as Python `int(v * scale)`. Float error is kept, not rounded away:
/// `12.3456 * 10000` is `123455.99999999999` and yields 123455. Anything that
/// ends up `<= 0` is absent as well, since upstream writes zero for "no data".
pub fn normalize_volume(raw: &CellValue, unit_scale: u32) -> Option<NonZeroU64> {
    let value = match raw {
        CellValue::Number(v) => *v,
        CellValue::Text(text) => parse_numeric_text(text)?,
        CellValue::Empty => return None,
    };
    if !value.is_finite() {
        return None;
    }

    let scaled = (value * f64::from(unit_scale)).trunc();
    if scaled < 1.0 {
        return None;
    }
    // float-to-int casts saturate
    NonZeroU64::new(scaled as u64)
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(raw: CellValue, scale: u32) -> Option<u64> {
        normalize_volume(&raw, scale).map(NonZeroU64::get)
    }

    #[test]
    fn scales_ten_thousands() {
        assert_eq!(volume(CellValue::Number(41.4784), 10_000), Some(414784));
        assert_eq!(volume("41.4784".into(), 10_000), Some(414784));
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(volume(CellValue::Number(1234.99), 1), Some(1234));
        assert_eq!(volume(CellValue::Number(0.00019), 10_000), Some(1));
        // the float product lands just under 123456
        assert_eq!(volume(CellValue::Number(12.3456), 10_000), Some(123455));
    }

    #[test]
    fn plain_counts_pass_through() {
        assert_eq!(volume("300000".into(), DEFAULT_UNIT_SCALE), Some(300000));
        assert_eq!(volume(" 1,200 ".into(), DEFAULT_UNIT_SCALE), Some(1200));
    }

    #[test]
    fn missing_and_invalid_cells_are_absent() {
        assert_eq!(volume(CellValue::Empty, 1), None);
        assert_eq!(volume("".into(), 1), None);
        assert_eq!(volume("   ".into(), 1), None);
        assert_eq!(volume("NaN".into(), 1), None);
        assert_eq!(volume(CellValue::Number(f64::NAN), 1), None);
        assert_eq!(volume(CellValue::Number(f64::INFINITY), 1), None);
        assert_eq!(volume("n/a".into(), 1), None);
    }

    #[test]
    fn non_positive_values_are_absent() {
        assert_eq!(volume(CellValue::Number(0.0), 1), None);
        assert_eq!(volume("-12".into(), 1), None);
        assert_eq!(volume(CellValue::Number(0.4), 1), None);
        assert_eq!(volume(CellValue::Number(5.0), 0), None);
    }
}
