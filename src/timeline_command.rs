use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::datetime;
use crate::record::{default_day_slots, sort_slots_by_time, TimeSlotEntry};
use crate::store::RecordStore;

/// 1日分のタイムラインを表示するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct TimelineArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,

    #[clap(
        short = 'u',
        long = "user",
        help = "Sets the record owner",
        default_value = "default"
    )]
    user: String,
}

pub struct TimelineCommand<'a, T: RecordStore> {
    store: &'a T,
}

impl<'a, T: RecordStore> TimelineCommand<'a, T> {
    /// 新しい`TimelineCommand`を返す。
    pub fn new(store: &'a T) -> Self {
        Self { store }
    }

    /// `timeline`サブコマンドの処理を行う。
    ///
    /// 指定日の記録があればその枠を時刻順で返し、無ければカテゴリ
    /// 未記入の48枠を返す。日付が指定されていない場合は、現在の
    /// UTC日付を利用する。
    ///
    /// # Arguments
    ///
    /// * `args` - `timeline`サブコマンドの引数
    pub async fn run(&self, args: TimelineArgs) -> Result<(NaiveDate, Vec<TimeSlotEntry>)> {
        let date = args.date.unwrap_or_else(datetime::today);

        let records = self
            .store
            .read_day_records(&args.user)
            .await
            .context("Failed to read day records")?;

        let slots = match records.iter().find(|record| record.date == date) {
            Some(record) => {
                info!("Found {} slots for {}", record.slots.len(), date);
                sort_slots_by_time(&record.slots)
            }
            None => {
                info!("No record for {}, showing the empty grid", date);
                default_day_slots()
            }
        };

        Ok((date, slots))
    }
}

/// 日付をパースする。
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};

    use super::{TimelineArgs, TimelineCommand};
    use crate::datetime::mock_datetime;
    use crate::record::{DayRecord, TimeSlotEntry};
    use crate::store::MockRecordStore;

    /// 記録がある日はその枠が時刻順で返ることを確認する。
    #[tokio::test]
    async fn test_timeline_command_with_record() {
        let args = TimelineArgs {
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            user: "default".to_string(),
        };
        let mut store = MockRecordStore::new();
        store.expect_read_day_records().times(1).returning(|_| {
            Ok(vec![DayRecord::new(
                "default",
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                vec![
                    TimeSlotEntry {
                        category: "Work".to_string(),
                        time: "T10:00:00+00:00".to_string(),
                        timezone: "UTC".to_string(),
                    },
                    TimeSlotEntry {
                        category: "Sleep".to_string(),
                        time: "T08:00:00+00:00".to_string(),
                        timezone: "UTC".to_string(),
                    },
                ],
            )])
        });

        let command = TimelineCommand::new(&store);
        let (date, slots) = command.run(args).await.unwrap();

        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].category, "Sleep");
        assert_eq!(slots[1].category, "Work");
    }

    /// 記録が無い日はカテゴリ未記入の48枠が返ることを確認する。
    #[tokio::test]
    async fn test_timeline_command_without_record() {
        let args = TimelineArgs {
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            user: "default".to_string(),
        };
        let mut store = MockRecordStore::new();
        store
            .expect_read_day_records()
            .times(1)
            .returning(|_| Ok(vec![]));

        let command = TimelineCommand::new(&store);
        let (_, slots) = command.run(args).await.unwrap();

        assert_eq!(slots.len(), 48);
        assert!(slots.iter().all(|slot| slot.category.is_empty()));
    }

    /// 日付を指定しない場合に現在のUTC日付が使われることを確認する。
    #[tokio::test]
    async fn test_timeline_command_no_date() {
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339("2024-01-03T12:00:00+00:00")
                .unwrap()
                .to_utc(),
        );
        let args = TimelineArgs {
            date: None,
            user: "default".to_string(),
        };
        let mut store = MockRecordStore::new();
        store
            .expect_read_day_records()
            .times(1)
            .returning(|_| Ok(vec![]));

        let command = TimelineCommand::new(&store);
        let (date, _) = command.run(args).await.unwrap();

        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

        mock_datetime::clear_mock_time();
    }
}
