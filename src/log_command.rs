use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::datetime;
use crate::reconcile::reconcile;
use crate::record::{DayRecord, TimeSlotEntry};
use crate::store::RecordStore;
use crate::time_slot::TimeSlotKey;

/// 1日分の枠を記録するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct LogArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,

    #[clap(
        short = 's',
        long = "slot",
        help = "Adds a half-hour entry in the format HH:MM=CATEGORY",
        parse(try_from_str = parse_slot),
        required = true,
    )]
    slots: Vec<SlotArg>,

    #[clap(
        short = 'u',
        long = "user",
        help = "Sets the record owner",
        default_value = "default"
    )]
    user: String,
}

/// `HH:MM=CATEGORY`形式で指定された1枠を表す構造体。
#[derive(Clone, Debug)]
pub struct SlotArg {
    key: TimeSlotKey,
    category: String,
}

pub struct LogCommand<'a, T: RecordStore> {
    store: &'a T,
}

impl<'a, T: RecordStore> LogCommand<'a, T> {
    /// 新しい`LogCommand`を返す。
    ///
    /// # Arguments
    /// * `store` - 記録の読み書きを行うリポジトリ
    pub fn new(store: &'a T) -> Self {
        Self { store }
    }

    /// `log`サブコマンドの処理を行う。
    ///
    /// 指定日の保存済み記録と新規送信分を統合して書き戻す。
    /// 同じ時刻キーの枠は新規送信側が勝ち、送信が触れていない枠は残る。
    /// 変更した枠だけを送信すれば他の枠はそのまま保持される。
    /// 日付が指定されていない場合は、現在のUTC日付を利用する。
    ///
    /// # Arguments
    ///
    /// * `args` - `log`サブコマンドの引数
    pub async fn run(&self, args: LogArgs) -> Result<DayRecord> {
        let date = args.date.unwrap_or_else(datetime::today);

        // 1つの時刻キーに入る枠は高々1つ
        let mut seen = HashSet::new();
        for slot in &args.slots {
            if !seen.insert(slot.key) {
                bail!("Duplicate slot time: {}", slot.key);
            }
        }

        let new_slots: Vec<TimeSlotEntry> = args
            .slots
            .iter()
            .map(|slot| TimeSlotEntry {
                category: slot.category.clone(),
                time: slot.key.to_entry_time(),
                timezone: "UTC".to_string(),
            })
            .collect();

        let records = self
            .store
            .read_day_records(&args.user)
            .await
            .context("Failed to read day records")?;
        let existing_slots = records
            .iter()
            .find(|record| record.date == date)
            .map(|record| record.slots.clone())
            .unwrap_or_default();

        let merged = reconcile(&new_slots, &existing_slots);
        info!(
            "Merged {} submitted slots with {} existing slots into {} slots for {}",
            new_slots.len(),
            existing_slots.len(),
            merged.len(),
            date
        );

        let record = DayRecord::new(&args.user, date, merged);
        self.store
            .write_day_record(record.clone())
            .await
            .context("Failed to write day record")?;

        Ok(record)
    }
}

/// 日付をパースする。
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

/// `HH:MM=CATEGORY`形式の枠指定をパースする。
fn parse_slot(s: &str) -> Result<SlotArg> {
    let (time, category) = s
        .split_once('=')
        .with_context(|| format!("Expected HH:MM=CATEGORY but got: {}", s))?;
    let key = TimeSlotKey::parse(time)
        .with_context(|| format!("Failed to parse half-hour time: {}", time))?;
    if category.is_empty() {
        bail!("Category must not be empty: {}", s);
    }

    Ok(SlotArg {
        key,
        category: category.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate};

    use super::{parse_date, parse_slot, LogArgs, LogCommand};
    use crate::datetime::mock_datetime;
    use crate::record::{DayRecord, TimeSlotEntry};
    use crate::store::MockRecordStore;

    /// 保存済みの枠が無い日への記録を確認する。
    #[tokio::test]
    async fn test_log_command_new_date() {
        let args = LogArgs {
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            slots: vec![parse_slot("08:00=Sleep").unwrap()],
            user: "default".to_string(),
        };
        let mut store = MockRecordStore::new();
        store
            .expect_read_day_records()
            .times(1)
            .returning(|_| Ok(vec![]));
        store
            .expect_write_day_record()
            .withf(|record| record.slots.len() == 1 && record.slots[0].category == "Sleep")
            .times(1)
            .returning(|_| Ok(()));

        let command = LogCommand::new(&store);
        let record = command.run(args).await.unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(record.week, 1);
        assert_eq!(record.day_of_week, 3);
        assert_eq!(record.slots[0].time, "T08:00:00+00:00");
    }

    /// 同じ時刻キーは新規側が勝ち、触れていない枠が残ることを確認する。
    #[tokio::test]
    async fn test_log_command_merges_with_existing() {
        let args = LogArgs {
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            slots: vec![
                parse_slot("10:00=Work").unwrap(),
                parse_slot("11:00=Eating").unwrap(),
            ],
            user: "default".to_string(),
        };
        let mut store = MockRecordStore::new();
        store.expect_read_day_records().times(1).returning(|_| {
            Ok(vec![DayRecord::new(
                "default",
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                vec![
                    TimeSlotEntry {
                        category: "Sleep".to_string(),
                        time: "T10:00:00+00:00".to_string(),
                        timezone: "UTC".to_string(),
                    },
                    TimeSlotEntry {
                        category: "Sleep".to_string(),
                        time: "T09:30:00+00:00".to_string(),
                        timezone: "UTC".to_string(),
                    },
                ],
            )])
        });
        store
            .expect_write_day_record()
            .withf(|record| record.slots.len() == 3)
            .times(1)
            .returning(|_| Ok(()));

        let command = LogCommand::new(&store);
        let record = command.run(args).await.unwrap();

        let categories: Vec<&str> = record
            .slots
            .iter()
            .map(|slot| slot.category.as_str())
            .collect();
        // 10:00はWorkに置き換わり、09:30のSleepは残る
        assert_eq!(categories, vec!["Work", "Eating", "Sleep"]);
        assert_eq!(record.slots[2].time, "T09:30:00+00:00");
    }

    /// 日付を指定しない場合に現在のUTC日付が使われることを確認する。
    #[tokio::test]
    async fn test_log_command_no_date() {
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339("2024-01-03T12:00:00+00:00")
                .unwrap()
                .to_utc(),
        );
        let args = LogArgs {
            date: None,
            slots: vec![parse_slot("08:00=Sleep").unwrap()],
            user: "default".to_string(),
        };
        let mut store = MockRecordStore::new();
        store
            .expect_read_day_records()
            .times(1)
            .returning(|_| Ok(vec![]));
        store
            .expect_write_day_record()
            .times(1)
            .returning(|_| Ok(()));

        let command = LogCommand::new(&store);
        let record = command.run(args).await.unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

        mock_datetime::clear_mock_time();
    }

    /// 同じ時刻キーの重複指定がエラーになることを確認する。
    #[tokio::test]
    async fn test_log_command_duplicate_slot() {
        let args = LogArgs {
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
            slots: vec![
                parse_slot("08:00=Sleep").unwrap(),
                parse_slot("08:00=Work").unwrap(),
            ],
            user: "default".to_string(),
        };
        let store = MockRecordStore::new();

        let command = LogCommand::new(&store);
        let result = command.run(args).await;

        assert!(result.is_err());
    }

    /// 日付のパースを確認する。
    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert!(parse_date("01-03-2024").is_err());
    }

    /// 枠指定のパースを確認する。
    #[test]
    fn test_parse_slot() {
        let slot = parse_slot("08:30=Sleep").unwrap();

        assert_eq!(slot.key.to_entry_time(), "T08:30:00+00:00");
        assert_eq!(slot.category, "Sleep");
        assert!(parse_slot("08:15=Sleep").is_err());
        assert!(parse_slot("08:30=").is_err());
        assert!(parse_slot("08:30").is_err());
    }
}
