use anyhow::{Context, Result};
use log::{info, warn};

use crate::datetime;
use crate::metrics::{year_breakdown, BreakdownRow};
use crate::rollup::bucket_by_day_of_week;
use crate::store::RecordStore;

/// 年間のカテゴリ別内訳を表示するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct BreakdownArgs {
    #[clap(
        short = 'y',
        long = "year",
        help = "Sets a custom year in the format YYYY",
        parse(try_from_str = parse_year),
    )]
    year: Option<i32>,

    #[clap(
        short = 'u',
        long = "user",
        help = "Sets the record owner",
        default_value = "default"
    )]
    user: String,
}

pub struct BreakdownCommand<'a, T: RecordStore> {
    store: &'a T,
}

impl<'a, T: RecordStore> BreakdownCommand<'a, T> {
    /// 新しい`BreakdownCommand`を返す。
    pub fn new(store: &'a T) -> Self {
        Self { store }
    }

    /// `breakdown`サブコマンドの処理を行う。
    ///
    /// 対象年の全記録からカテゴリ別の合計時間と割合を計算する。
    /// 7つの曜日バケットは年内の全日をちょうど1回ずつ含むため、
    /// その合計は年間合計時間に一致する。
    /// 年が指定されていない場合は、現在の年を利用する。
    ///
    /// # Arguments
    ///
    /// * `args` - `breakdown`サブコマンドの引数
    pub async fn run(&self, args: BreakdownArgs) -> Result<(i32, Vec<BreakdownRow>)> {
        let year = args.year.unwrap_or_else(datetime::current_year);

        let records = self
            .store
            .read_day_records(&args.user)
            .await
            .context("Failed to read day records")?;
        let categories = self
            .store
            .read_categories()
            .await
            .context("Failed to read categories")?;

        let rollup = bucket_by_day_of_week(&records, year);
        if rollup.skipped_entries > 0 {
            warn!(
                "Skipped {} time entries with unrecognized time values",
                rollup.skipped_entries
            );
        }

        let rows = year_breakdown(&rollup.buckets, &categories);
        info!("Computed breakdown of {} categories for {}", rows.len(), year);

        Ok((year, rows))
    }
}

/// 年をパースする。
fn parse_year(s: &str) -> Result<i32> {
    s.parse::<i32>()
        .with_context(|| format!("Failed to parse year: {}", s))
}
