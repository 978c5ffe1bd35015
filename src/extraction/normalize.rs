//! Value Normalizer: cleans a single extracted string according to its
//! field's semantics (date, categorical label, free text).

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Explicit date layouts, tried in declared order. Layouts without a
/// day component are parsed with a synthetic first-of-month day.
const DATE_LAYOUTS: &[(&str, bool)] = &[
    ("%B %d, %Y", true), // October 28, 2023
    ("%b %d, %Y", true), // Oct 28, 2023
    ("%B %d %Y", true),  // October 28 2023 (no comma)
    ("%b %d %Y", true),  // Oct 28 2023
    ("%B %Y", false),    // October 2023
    ("%b %Y", false),    // Oct 2023
    ("%m/%d/%Y", true),  // 10/28/2023
    ("%m-%d-%Y", true),  // 10-28-2023
    ("%d/%m/%Y", true),  // 28/10/2023
    ("%Y-%m-%d", true),  // 2023-10-28
];

static YEAR_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

static MONTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(0?[1-9]|1[0-2])\b").unwrap());

/// Month-name lookup for the last-resort fallback. Full names first so
/// they win over their own abbreviations on substring search.
const MONTH_NAMES: &[(&str, &str)] = &[
    ("january", "01"),
    ("february", "02"),
    ("march", "03"),
    ("april", "04"),
    ("may", "05"),
    ("june", "06"),
    ("july", "07"),
    ("august", "08"),
    ("september", "09"),
    ("october", "10"),
    ("november", "11"),
    ("december", "12"),
    ("jan", "01"),
    ("feb", "02"),
    ("mar", "03"),
    ("apr", "04"),
    ("jun", "06"),
    ("jul", "07"),
    ("aug", "08"),
    ("sep", "09"),
    ("oct", "10"),
    ("nov", "11"),
    ("dec", "12"),
];

/// Clean an extracted value: collapse whitespace runs, trim trailing
/// punctuation, then apply field-specific rules.
pub fn clean_value(raw: &str, field: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_end_matches(['.', ',', ';', ':']);

    if field.contains("date") {
        normalize_date(trimmed)
    } else if field == "credential_type" {
        capitalize(trimmed)
    } else if field == "employment_type" {
        trimmed.to_lowercase().replace(' ', "-")
    } else {
        trimmed.to_string()
    }
}

/// Normalize a date string to `YYYY-MM`.
///
/// Tries the explicit layouts first; on failure falls back to
/// independent year/month token search, then to month-name lookup.
/// Returns the trimmed input unchanged when nothing parses — callers
/// must tolerate non-canonical date strings downstream.
pub fn normalize_date(raw: &str) -> String {
    let date_str = raw.trim();

    for (layout, has_day) in DATE_LAYOUTS {
        let parsed = if *has_day {
            NaiveDate::parse_from_str(date_str, layout)
        } else {
            NaiveDate::parse_from_str(&format!("{date_str} 1"), &format!("{layout} %d"))
        };
        if let Ok(date) = parsed {
            return date.format("%Y-%m").to_string();
        }
    }

    // No layout matched: look for a 4-digit year (2000s only) and a
    // 1-2 digit month token independently.
    if let Some(year) = YEAR_TOKEN.captures(date_str).map(|c| c[1].to_string()) {
        if let Some(month) = MONTH_TOKEN.captures(date_str) {
            return format!("{year}-{:0>2}", &month[1]);
        }

        let lowered = date_str.to_lowercase();
        for (name, number) in MONTH_NAMES {
            if lowered.contains(name) {
                return format!("{year}-{number}");
            }
        }
    }

    date_str.to_string()
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_day_year_layouts_normalize() {
        assert_eq!(normalize_date("October 28, 2023"), "2023-10");
        assert_eq!(normalize_date("Oct 28, 2023"), "2023-10");
        assert_eq!(normalize_date("October 28 2023"), "2023-10");
        assert_eq!(normalize_date("10/28/2023"), "2023-10");
        assert_eq!(normalize_date("10-28-2023"), "2023-10");
        assert_eq!(normalize_date("2023-10-28"), "2023-10");
    }

    #[test]
    fn month_year_only_normalizes() {
        assert_eq!(normalize_date("October 2023"), "2023-10");
        assert_eq!(normalize_date("Feb 2021"), "2021-02");
    }

    #[test]
    fn day_first_layout_when_month_slot_invalid() {
        // 28 cannot be a month, so the day-first layout wins.
        assert_eq!(normalize_date("28/10/2023"), "2023-10");
    }

    #[test]
    fn token_fallback_finds_year_and_month() {
        assert_eq!(normalize_date("renewed 7 2024"), "2024-07");
        assert_eq!(normalize_date("valid 11 of 2022"), "2022-11");
    }

    #[test]
    fn month_name_fallback_with_year() {
        assert_eq!(normalize_date("sometime in March, 2022"), "2022-03");
        assert_eq!(normalize_date("awarded during DECEMBER 2021 ceremony"), "2021-12");
    }

    #[test]
    fn unparseable_date_passes_through() {
        assert_eq!(normalize_date("no date here"), "no date here");
        // Year before 2000 is outside the token fallback.
        assert_eq!(normalize_date("spring 1999"), "spring 1999");
    }

    #[test]
    fn year_alone_passes_through() {
        // A bare year has no month token and no month name.
        assert_eq!(normalize_date("2023"), "2023");
    }

    #[test]
    fn clean_collapses_whitespace_and_trims_punctuation() {
        assert_eq!(clean_value("  Acme   Corp. ", "employer"), "Acme Corp");
        assert_eq!(clean_value("Senior Engineer;", "job_title"), "Senior Engineer");
    }

    #[test]
    fn clean_capitalizes_credential_type() {
        assert_eq!(clean_value("CERTIFICATION", "credential_type"), "Certification");
        assert_eq!(clean_value("bootcamp", "credential_type"), "Bootcamp");
    }

    #[test]
    fn clean_hyphenates_employment_type() {
        assert_eq!(clean_value("Full time", "employment_type"), "full-time");
        assert_eq!(clean_value("CONTRACT", "employment_type"), "contract");
    }

    #[test]
    fn clean_routes_any_date_field_through_normalization() {
        assert_eq!(clean_value("January 2020", "start_date"), "2020-01");
        assert_eq!(clean_value("October 28, 2023", "date"), "2023-10");
    }

    #[test]
    fn clean_of_empty_input_is_empty() {
        assert_eq!(clean_value("   ", "title"), "");
        assert_eq!(clean_value("...", "title"), "");
    }
}
