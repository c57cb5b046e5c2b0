use anyhow::{Context, Result};
use log::{info, warn};

use crate::datetime;
use crate::metrics::{chart_series, SumType};
use crate::rollup::{bucket_by_day_of_week, bucket_by_hour_of_day, bucket_by_week, Rollup};
use crate::store::RecordStore;

/// 年間ロールアップのチャートを表示するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct ChartsArgs {
    #[clap(
        short = 'y',
        long = "year",
        help = "Sets a custom year in the format YYYY",
        parse(try_from_str = parse_year),
    )]
    year: Option<i32>,

    #[clap(
        short = 'v',
        long = "view",
        help = "Selects which rollup to show (all when omitted)",
        arg_enum
    )]
    view: Option<ChartView>,

    #[clap(
        short = 'c',
        long = "category",
        help = "Limits the charts to a single category"
    )]
    category: Option<String>,

    #[clap(long = "average", help = "Shows averages instead of totals")]
    average: bool,

    #[clap(
        short = 'u',
        long = "user",
        help = "Sets the record owner",
        default_value = "default"
    )]
    user: String,
}

/// チャートの種類を表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ArgEnum)]
pub enum ChartView {
    Week,
    Day,
    Hour,
}

/// 見出し付きの1系列を表す構造体。
#[derive(Clone, Debug)]
pub struct ChartSeries {
    pub title: String,
    pub points: Vec<(String, f64)>,
}

pub struct ChartsCommand<'a, T: RecordStore> {
    store: &'a T,
}

impl<'a, T: RecordStore> ChartsCommand<'a, T> {
    /// 新しい`ChartsCommand`を返す。
    pub fn new(store: &'a T) -> Self {
        Self { store }
    }

    /// `charts`サブコマンドの処理を行う。
    ///
    /// 対象年の記録を週別・曜日別・時刻別のバケットへ分配し、
    /// カテゴリごとの(ラベル, 値)系列を作成する。
    /// 年が指定されていない場合は、現在の年を利用する。
    ///
    /// # Arguments
    ///
    /// * `args` - `charts`サブコマンドの引数
    pub async fn run(&self, args: ChartsArgs) -> Result<Vec<ChartSeries>> {
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
        let selected = match &args.category {
            Some(name) => vec![categories
                .iter()
                .find(|category| &category.name == name)
                .cloned()
                .with_context(|| format!("Unknown category: {}", name))?],
            None => categories,
        };

        let sum_type = if args.average {
            SumType::Average
        } else {
            SumType::Total
        };
        let views = match args.view {
            Some(view) => vec![view],
            None => vec![ChartView::Week, ChartView::Day, ChartView::Hour],
        };

        let mut all_series = Vec::new();
        for view in views {
            let rollup: Rollup = match view {
                ChartView::Week => bucket_by_week(&records, year),
                ChartView::Day => bucket_by_day_of_week(&records, year),
                ChartView::Hour => bucket_by_hour_of_day(&records, year),
            };
            if rollup.skipped_entries > 0 {
                warn!(
                    "Skipped {} time entries with unrecognized time values",
                    rollup.skipped_entries
                );
            }

            for category in &selected {
                all_series.push(ChartSeries {
                    title: series_title(sum_type, &category.name, view),
                    points: chart_series(&category.name, sum_type, &rollup.buckets, year),
                });
            }
        }
        info!("Created {} chart series for {}", all_series.len(), year);

        Ok(all_series)
    }
}

/// チャートの見出しを作成する。
fn series_title(sum_type: SumType, category: &str, view: ChartView) -> String {
    let sum_text = match sum_type {
        SumType::Total => "Total",
        SumType::Average => "Average",
    };
    match view {
        ChartView::Week => format!("{} {} Hours by Weeks", sum_text, category),
        ChartView::Day => format!("{} {} Hours by Days", sum_text, category),
        ChartView::Hour => format!("{} {} Hours", sum_text, category),
    }
}

/// 年をパースする。
fn parse_year(s: &str) -> Result<i32> {
    s.parse::<i32>()
        .with_context(|| format!("Failed to parse year: {}", s))
}
