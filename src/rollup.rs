use std::collections::BTreeMap;

use chrono::Datelike;

use crate::record::{DayRecord, TimeSlotEntry};
use crate::time_slot::TimeSlotKey;
use crate::week;

/// バケットの種別を表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketKind {
    Week,
    DayOfWeek,
    HourOfDay,
}

/// バケットの集計キーを表す列挙型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketKey {
    /// 表示用週番号(1..=54)。
    Week(u32),
    /// 曜日番号(日曜=0)。
    DayOfWeek(u32),
    /// 30分枠の時刻キー。
    HourOfDay(TimeSlotKey),
}

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

impl BucketKey {
    /// キーの種別を返す。
    pub fn kind(&self) -> BucketKind {
        match self {
            Self::Week(_) => BucketKind::Week,
            Self::DayOfWeek(_) => BucketKind::DayOfWeek,
            Self::HourOfDay(_) => BucketKind::HourOfDay,
        }
    }

    /// チャートの横軸ラベルを返す。
    ///
    /// 週は週番号、曜日は短縮名、時刻は12時間表記。
    pub fn label(&self) -> String {
        match self {
            Self::Week(week) => week.to_string(),
            Self::DayOfWeek(day) => DAY_NAMES
                .get(*day as usize)
                .unwrap_or(&"???")
                .to_string(),
            Self::HourOfDay(key) => key.to_clock12(),
        }
    }
}

/// 1つの集計バケットを表す構造体。
///
/// バケットは枠のグループの一覧を持つ。週バケットは寄与した日ごとに
/// 1グループずつ入れ子で蓄積し、曜日・時刻バケットは単一の平坦な
/// グループに連結する。集計時は`flatten`で両者を同じ形に揃える。
#[derive(Clone, Debug)]
pub struct Bucket {
    pub key: BucketKey,
    groups: Vec<Vec<TimeSlotEntry>>,
}

impl Bucket {
    fn new(key: BucketKey) -> Self {
        Self {
            key,
            groups: Vec::new(),
        }
    }

    /// 1日分の枠を1グループとして追加する。
    fn push_group(&mut self, group: Vec<TimeSlotEntry>) {
        self.groups.push(group);
    }

    /// 枠を平坦なグループへ追加する。
    fn push_flat(&mut self, slot: TimeSlotEntry) {
        if self.groups.is_empty() {
            self.groups.push(Vec::new());
        }
        self.groups[0].push(slot);
    }

    /// 全グループの枠を平坦化して返す。
    pub fn flatten(&self) -> impl Iterator<Item = &TimeSlotEntry> {
        self.groups.iter().flatten()
    }

    /// 寄与した日単位のグループ数を返す。
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// 年間ロールアップの結果を表す構造体。
///
/// `skipped_entries`は時刻表現を解釈できずに集計から除外した枠の数。
/// 1件の不正な記録で年間チャート全体が欠けないよう、除外して数だけ残す。
#[derive(Clone, Debug)]
pub struct Rollup {
    pub buckets: Vec<Bucket>,
    pub skipped_entries: usize,
}

/// 対象年の記録を週番号ごとのバケットへ分配する。
///
/// 週1..=52のバケットはデータが無くても必ず作り、チャートの横軸を
/// 安定させる。週53/54のバケットは該当する日付があるときだけ作る。
/// 各記録の枠一覧は1日分を1グループとして入れ子のまま追加する。
/// 結果は週番号の昇順。
pub fn bucket_by_week(records: &[DayRecord], year: i32) -> Rollup {
    let mut buckets: BTreeMap<u32, Bucket> = (1..=52)
        .map(|week| (week, Bucket::new(BucketKey::Week(week))))
        .collect();
    let mut skipped = 0;

    for record in records_in_year(records, year) {
        let week = week::correct_week(record.date.month(), record.week);
        // 範囲外の週番号を持つ記録は集計から落とす
        if !(1..=54).contains(&week) {
            continue;
        }

        let (group, bad) = recognized_slots(&record.slots);
        skipped += bad;
        if group.is_empty() {
            continue;
        }

        buckets
            .entry(week)
            .or_insert_with(|| Bucket::new(BucketKey::Week(week)))
            .push_group(group);
    }

    Rollup {
        buckets: buckets.into_values().collect(),
        skipped_entries: skipped,
    }
}

/// 対象年の記録を曜日(日曜=0)ごとのバケットへ分配する。
///
/// 7つのバケットは常に存在し、各記録の枠は入れ子にせず平坦に連結する。
pub fn bucket_by_day_of_week(records: &[DayRecord], year: i32) -> Rollup {
    let mut buckets: Vec<Bucket> = (0..7)
        .map(|day| Bucket::new(BucketKey::DayOfWeek(day)))
        .collect();
    let mut skipped = 0;

    for record in records_in_year(records, year) {
        let (group, bad) = recognized_slots(&record.slots);
        skipped += bad;

        match buckets.get_mut(record.day_of_week as usize) {
            Some(bucket) => {
                for slot in group {
                    bucket.push_flat(slot);
                }
            }
            // 範囲外の曜日番号を持つ記録は集計から落とす
            None => continue,
        }
    }

    Rollup {
        buckets,
        skipped_entries: skipped,
    }
}

/// 対象年の記録の枠を時刻キーごとのバケットへ分配する。
///
/// 48個のバケットは常に存在し、時刻の昇順に並ぶ。各枠は日でまとめず、
/// 枠自身の時刻キーと一致するバケットへ直接入る。
pub fn bucket_by_hour_of_day(records: &[DayRecord], year: i32) -> Rollup {
    let mut buckets: Vec<Bucket> = TimeSlotKey::grid()
        .into_iter()
        .map(|key| Bucket::new(BucketKey::HourOfDay(key)))
        .collect();
    let mut skipped = 0;

    for record in records_in_year(records, year) {
        for slot in &record.slots {
            match slot.slot_key() {
                Some(key) => buckets[key.grid_index()].push_flat(slot.clone()),
                None => skipped += 1,
            }
        }
    }

    Rollup {
        buckets,
        skipped_entries: skipped,
    }
}

/// 対象年の記録だけを返す。
fn records_in_year(records: &[DayRecord], year: i32) -> impl Iterator<Item = &DayRecord> {
    records
        .iter()
        .filter(move |record| record.date.year() == year)
}

/// 時刻キーを解釈できる枠と、除外した枠の数を返す。
fn recognized_slots(slots: &[TimeSlotEntry]) -> (Vec<TimeSlotEntry>, usize) {
    let mut recognized = Vec::with_capacity(slots.len());
    let mut skipped = 0;

    for slot in slots {
        if slot.slot_key().is_some() {
            recognized.push(slot.clone());
        } else {
            skipped += 1;
        }
    }

    (recognized, skipped)
}
