use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{is_metadata_key, CellValue, Row};

/// Share of non-empty values that must parse as numbers before a column
/// counts as numeric.
const NUMERIC_THRESHOLD: f64 = 0.5;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));
static SLASH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("valid regex"));
static GERMAN_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").expect("valid regex"));
static COMPACT_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("valid regex"));

/// Column keys in first-seen order across all rows, metadata keys excluded.
fn column_keys(rows: &[Row]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !is_metadata_key(key) && !keys.iter().any(|k| k == key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

/// Columns where at least half of the non-empty cells parse as numbers,
/// in first-seen order. Empty table yields an empty list.
pub fn detect_numeric_columns(rows: &[Row]) -> Vec<String> {
    column_keys(rows)
        .into_iter()
        .filter(|key| {
            let mut non_empty = 0usize;
            let mut numeric = 0usize;
            for row in rows {
                match row.get(key) {
                    Some(cell) if !cell.is_missing() => {
                        non_empty += 1;
                        if cell.as_number().is_some() {
                            numeric += 1;
                        }
                    }
                    _ => {}
                }
            }
            non_empty > 0 && numeric as f64 / non_empty as f64 >= NUMERIC_THRESHOLD
        })
        .collect()
}

fn is_date_string(s: &str) -> bool {
    ISO_DATE_RE.is_match(s)
        || SLASH_DATE_RE.is_match(s)
        || GERMAN_DATE_RE.is_match(s)
        || COMPACT_DATE_RE.is_match(s)
}

/// Columns holding any date-shaped value, in first-seen order. Unlike numeric
/// detection there is no ratio threshold: the first matching cell qualifies
/// the whole column.
pub fn detect_date_columns(rows: &[Row]) -> Vec<String> {
    column_keys(rows)
        .into_iter()
        .filter(|key| {
            rows.iter().any(|row| match row.get(key) {
                Some(CellValue::Date(_)) => true,
                Some(CellValue::Text(s)) => is_date_string(s.trim()),
                _ => false,
            })
        })
        .collect()
}

/// Normalizes the recognized date shapes to a calendar date, or `None` when
/// the cell is not a date.
///
/// Slash dates are read as DD/MM/YYYY. That is a fixed locale convention of
/// the upstream data (German receipts), not a general-purpose parser; US-style
/// MM/DD input will be misread and callers must not assume US ordering.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Text(raw) => {
            let s = raw.trim();
            if COMPACT_DATE_RE.is_match(s) {
                let year: i32 = s[0..4].parse().ok()?;
                let month: u32 = s[4..6].parse().ok()?;
                let day: u32 = s[6..8].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            } else if ISO_DATE_RE.is_match(s) {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
            } else if GERMAN_DATE_RE.is_match(s) {
                NaiveDate::parse_from_str(s, "%d.%m.%Y").ok()
            } else if SLASH_DATE_RE.is_match(s) {
                NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        let mut row = IndexMap::new();
        for (k, v) in pairs {
            row.insert((*k).to_string(), v.clone());
        }
        row
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn numeric_detection_uses_half_threshold() {
        let rows = vec![
            row(&[("amt", num(10.0)), ("name", text("Alice"))]),
            row(&[("amt", text("20.5")), ("name", text("Bob"))]),
            row(&[("amt", text("n/a")), ("name", text("7"))]),
            row(&[("amt", num(3.0)), ("name", text("Carol"))]),
        ];
        // amt: 3 of 4 numeric; name: 1 of 4.
        assert_eq!(detect_numeric_columns(&rows), vec!["amt".to_string()]);
    }

    #[test]
    fn numeric_detection_skips_missing_and_metadata() {
        let rows = vec![
            row(&[
                ("amt", CellValue::Missing),
                ("_sourceFileName", text("a.xlsx")),
            ]),
            row(&[("amt", text("")), ("_sourceFileName", text("a.xlsx"))]),
            row(&[("amt", num(5.0))]),
        ];
        // One non-empty value, numeric: 1/1 passes.
        assert_eq!(detect_numeric_columns(&rows), vec!["amt".to_string()]);
        assert!(detect_numeric_columns(&[]).is_empty());
    }

    #[test]
    fn columns_come_back_in_first_seen_order() {
        let rows = vec![
            row(&[("b", num(1.0))]),
            row(&[("a", num(2.0)), ("b", num(3.0))]),
        ];
        assert_eq!(
            detect_numeric_columns(&rows),
            vec!["b".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn date_detection_qualifies_on_a_single_match() {
        let rows = vec![
            row(&[("when", text("notes")), ("who", text("Alice"))]),
            row(&[("when", text("2025-03-01"))]),
        ];
        assert_eq!(detect_date_columns(&rows), vec!["when".to_string()]);
    }

    #[test]
    fn date_detection_recognizes_all_four_shapes() {
        for s in ["2025-01-31", "31/01/2025", "31.01.2025", "20250131"] {
            let rows = vec![row(&[("d", text(s))])];
            assert_eq!(detect_date_columns(&rows), vec!["d".to_string()], "{s}");
        }
        let rows = vec![row(&[("d", text("31st of Jan"))])];
        assert!(detect_date_columns(&rows).is_empty());
    }

    #[test]
    fn parse_date_handles_compact_and_iso() {
        assert_eq!(
            parse_date(&text("20250131")),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(
            parse_date(&text("2025-03-09")),
            NaiveDate::from_ymd_opt(2025, 3, 9)
        );
    }

    #[test]
    fn parse_date_uses_european_order() {
        // German dotted form: day first.
        assert_eq!(
            parse_date(&text("05.01.2025")),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        // Slash form is DD/MM/YYYY as well, never US month-first.
        assert_eq!(
            parse_date(&text("01/05/2025")),
            NaiveDate::from_ymd_opt(2025, 5, 1)
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date(&text("2025-13-01")), None);
        assert_eq!(parse_date(&text("30.02.2025")), None);
        assert_eq!(parse_date(&text("hello")), None);
        assert_eq!(parse_date(&num(42.0)), None);
        assert_eq!(parse_date(&CellValue::Missing), None);
    }

    #[test]
    fn parse_date_passes_native_dates_through() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 24).unwrap();
        assert_eq!(parse_date(&CellValue::Date(d)), Some(d));
    }
}
