use chrono::{Datelike, NaiveDate};

/// 日付に表示用の週番号(1..=54)を割り当てる。
///
/// ISO週番号を基礎とし、12月末の日付が翌年の週1/週2へ丸め込まれる場合は
/// 53/54へ振り直す。補正しないと年末の記録が週番号軸のチャート上で
/// 年初の記録と同じ位置に重なってしまう。
pub fn assign_week(date: NaiveDate) -> u32 {
    correct_week(date.month(), date.iso_week().week())
}

/// 基礎週番号に12月末の補正を適用する。
///
/// 補正済みの週番号(53/54)に再適用しても値は変わらない。
pub fn correct_week(month: u32, base_week: u32) -> u32 {
    if month == 12 && base_week == 1 {
        return 53;
    }
    if month == 12 && base_week == 2 {
        return 54;
    }
    base_week
}

/// 対象年の日数を返す。閏年は366日。
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::{assign_week, correct_week, days_in_year};

    /// 年末年始の境界を含めて週番号が割り当てられることを確認する。
    ///
    /// 2025-12-29と2024-12-30はISO週番号では翌年の週1に入る日付。
    #[rstest]
    #[case::first_week(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 1)]
    #[case::mid_year(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(), 24)]
    #[case::december_rolled_into_next_year(NaiveDate::from_ymd_opt(2025, 12, 29).unwrap(), 53)]
    #[case::december_rolled_into_next_year_leap(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(), 53)]
    #[case::december_own_week(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(), 53)]
    #[case::december_not_rolled(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(), 52)]
    fn test_assign_week(#[case] date: NaiveDate, #[case] expected: u32) {
        assert_eq!(assign_week(date), expected);
    }

    /// 12月末の補正を確認する。
    #[rstest]
    #[case::december_week_one(12, 1, 53)]
    #[case::december_week_two(12, 2, 54)]
    #[case::december_normal_week(12, 50, 50)]
    #[case::january_untouched(1, 1, 1)]
    #[case::idempotent_on_corrected(12, 53, 53)]
    fn test_correct_week(#[case] month: u32, #[case] base_week: u32, #[case] expected: u32) {
        assert_eq!(correct_week(month, base_week), expected);
    }

    /// 閏年判定を確認する。
    #[rstest]
    #[case::leap(2024, 366)]
    #[case::common(2023, 365)]
    #[case::century_leap(2000, 366)]
    #[case::century_common(1900, 365)]
    fn test_days_in_year(#[case] year: i32, #[case] expected: u32) {
        assert_eq!(days_in_year(year), expected);
    }
}
