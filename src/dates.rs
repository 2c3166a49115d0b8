//! Contract date arithmetic and Indonesian long-date formatting.
//!
//! All date tokens in templates use the fixed `dd MMMM yyyy` long format
//! (optionally prefixed by the day name). The engine never reads the wall
//! clock: "today" always derives from the caller-supplied start date.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::model::ContractType;

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

// Indexed by Weekday::num_days_from_monday().
const DAY_NAMES: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

/// End date = start + contract duration in years, minus one day.
/// A Feb 29 start clamps to Feb 28 before the subtraction when the target
/// year is not a leap year.
pub fn contract_end_date(start: NaiveDate, contract_type: ContractType) -> NaiveDate {
    start
        .checked_add_months(Months::new(contract_type.duration_years() * 12))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(start)
}

/// `14 Mei 2024` (zero-padded day, Indonesian month name).
pub fn format_long(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// `Selasa, 14 Mei 2024` — the signing-date form used in opening clauses.
pub fn format_day_long(date: NaiveDate) -> String {
    format!(
        "{}, {}",
        DAY_NAMES[date.weekday().num_days_from_monday() as usize],
        format_long(date)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_time_runs_five_years_minus_one_day() {
        assert_eq!(
            contract_end_date(date(2024, 1, 1), ContractType::PenuhWaktu),
            date(2028, 12, 31)
        );
    }

    #[test]
    fn part_time_runs_one_year_minus_one_day() {
        assert_eq!(
            contract_end_date(date(2024, 1, 1), ContractType::ParuhWaktu),
            date(2024, 12, 31)
        );
    }

    #[test]
    fn leap_day_start_clamps() {
        assert_eq!(
            contract_end_date(date(2024, 2, 29), ContractType::ParuhWaktu),
            date(2025, 2, 27)
        );
    }

    #[test]
    fn long_format_is_indonesian() {
        assert_eq!(format_long(date(2024, 5, 14)), "14 Mei 2024");
        assert_eq!(format_long(date(1988, 1, 5)), "05 Januari 1988");
    }

    #[test]
    fn day_long_format_includes_day_name() {
        assert_eq!(format_day_long(date(2024, 5, 14)), "Selasa, 14 Mei 2024");
        assert_eq!(format_day_long(date(2024, 1, 1)), "Senin, 01 Januari 2024");
    }
}
