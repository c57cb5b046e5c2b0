use chrono::{DateTime, Datelike, NaiveDate, Utc};

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// 現在のUTC日付を取得する。
///
/// 日付が指定されなかったサブコマンドの既定値に利用する。
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// 現在の年を取得する。
///
/// 年が指定されなかったサブコマンドの既定値に利用する。
pub fn current_year() -> i32 {
    now().year()
}


#[cfg(test)]
pub use mock_datetime::now;
