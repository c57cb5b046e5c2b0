use crate::record::Category;
use crate::rollup::{Bucket, BucketKind};
use crate::week;

/// 合計と平均のどちらを計算するかを表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SumType {
    Total,
    Average,
}

/// 年間内訳の1行を表す構造体。
#[derive(Clone, Debug)]
pub struct BreakdownRow {
    pub category: Category,
    pub hours: f64,
    pub percentage: f64,
}

/// 指定カテゴリのバケット内合計時間を計算する。
///
/// 30分枠2つで1時間。週バケットでは入れ子の日単位グループを
/// 平坦化した全枠が対象になる。
pub fn total_hours(category: &str, bucket: &Bucket) -> f64 {
    matching_slot_count(category, bucket) as f64 / 2.0
}

/// 指定カテゴリのバケット内平均時間を計算する。
///
/// 分子は合計と同じ枠数で、分母はバケット種別ごとの基準単位数。
/// 週は14(7日 × 30分枠2つ)で、週内の1日あたり平均時間になる。
/// 曜日と時刻は対象年の日数(365/366)。曜日別の分母はその曜日の
/// 出現回数(約52)ではなく年間日数を使う。
pub fn average_hours(category: &str, bucket: &Bucket, year: i32) -> f64 {
    let denominator = match bucket.key.kind() {
        BucketKind::Week => 14.0,
        BucketKind::DayOfWeek => week::days_in_year(year) as f64,
        BucketKind::HourOfDay => week::days_in_year(year) as f64,
    };
    if denominator == 0.0 {
        return 0.0;
    }
    matching_slot_count(category, bucket) as f64 / denominator
}

/// チャート用の(ラベル, 値)系列を作成する。
pub fn chart_series(
    category: &str,
    sum_type: SumType,
    buckets: &[Bucket],
    year: i32,
) -> Vec<(String, f64)> {
    buckets
        .iter()
        .map(|bucket| {
            let value = match sum_type {
                SumType::Total => total_hours(category, bucket),
                SumType::Average => average_hours(category, bucket, year),
            };
            (bucket.key.label(), value)
        })
        .collect()
}

/// 曜日別バケットから年間のカテゴリ別内訳を計算する。
///
/// 7つの曜日バケットは年内の全日をちょうど1回ずつ含むため、
/// 曜日別合計の総和はそのカテゴリの年間合計時間に一致する。
/// 割合は年間総時間に対する百分率で、総時間が0の年は全カテゴリ0%。
/// 結果はカテゴリIDの数値昇順。
pub fn year_breakdown(day_of_week_buckets: &[Bucket], categories: &[Category]) -> Vec<BreakdownRow> {
    let mut rows: Vec<BreakdownRow> = categories
        .iter()
        .map(|category| {
            let hours: f64 = day_of_week_buckets
                .iter()
                .map(|bucket| total_hours(&category.name, bucket))
                .sum();
            BreakdownRow {
                category: category.clone(),
                hours,
                percentage: 0.0,
            }
        })
        .collect();

    let year_total: f64 = rows.iter().map(|row| row.hours).sum();
    if year_total > 0.0 {
        for row in &mut rows {
            row.percentage = row.hours / year_total * 100.0;
        }
    }

    sort_rows_by_category_id(&mut rows);
    rows
}

/// 内訳の行をカテゴリIDの数値昇順に並べ替える。
///
/// 数値として解釈できないIDは末尾に回し、ID文字列の昇順で並べる。
fn sort_rows_by_category_id(rows: &mut [BreakdownRow]) {
    rows.sort_by(|a, b| {
        match (
            a.category.id.parse::<u64>(),
            b.category.id.parse::<u64>(),
        ) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.category.id.cmp(&b.category.id),
        }
    });
}

/// バケット内で指定カテゴリに一致する枠数を数える。
fn matching_slot_count(category: &str, bucket: &Bucket) -> usize {
    bucket
        .flatten()
        .filter(|entry| entry.category == category)
        .count()
}
