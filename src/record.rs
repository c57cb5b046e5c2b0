use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time_slot::TimeSlotKey;
use crate::week;

/// 1つの30分枠に記録されたカテゴリを表す構造体。
///
/// `time`は`T08:30:00+00:00`のような固定幅表現で保存される。
/// `timezone`は入力時の参考情報であり、枠の同一性判定には使わない。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotEntry {
    pub category: String,
    pub time: String,
    pub timezone: String,
}

impl TimeSlotEntry {
    /// 正規化した時刻キーを返す。解釈できない表現の場合は`None`。
    pub fn slot_key(&self) -> Option<TimeSlotKey> {
        TimeSlotKey::parse(&self.time)
    }
}

/// 1ユーザーの1日分の記録を表す構造体。
///
/// `date`はUTC正規化された暦日。`week`と`day_of_week`(日曜=0)は
/// 登録時に日付から割り当てて保存する。
/// 1つの時刻キーに対する枠は高々1つ(統合処理が維持する)。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub owner_id: String,
    pub date: NaiveDate,
    pub week: u32,
    pub day_of_week: u32,
    pub slots: Vec<TimeSlotEntry>,
}

impl DayRecord {
    /// 新しい`DayRecord`を返す。
    ///
    /// # Arguments
    /// * `owner_id` - 記録の所有ユーザー
    /// * `date` - 対象の暦日
    /// * `slots` - その日の枠一覧
    pub fn new(owner_id: &str, date: NaiveDate, slots: Vec<TimeSlotEntry>) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            date,
            week: week::assign_week(date),
            day_of_week: date.weekday().num_days_from_sunday(),
            slots,
        }
    }
}

/// 集計対象のカテゴリを表す構造体。
///
/// カテゴリの同一性は集計側からは不透明なキーとして扱う。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: String,
}

/// 枠一覧を時刻表現の昇順に並べ替えて返す。
pub fn sort_slots_by_time(slots: &[TimeSlotEntry]) -> Vec<TimeSlotEntry> {
    let mut sorted = slots.to_vec();
    sorted.sort_by(|a, b| a.time.cmp(&b.time));
    sorted
}

/// 1日分の空タイムライン(カテゴリ未記入の48枠)を返す。
pub fn default_day_slots() -> Vec<TimeSlotEntry> {
    TimeSlotKey::grid()
        .into_iter()
        .map(|key| TimeSlotEntry {
            category: String::new(),
            time: key.to_entry_time(),
            timezone: "UTC".to_string(),
        })
        .collect()
}

/// 初回起動時にストアへ投入する既定カテゴリ一覧を返す。
pub fn default_categories() -> Vec<Category> {
    const DEFAULTS: &[(&str, &str, &str, &str)] = &[
        ("0", "Sleep", "#666666", "Zzz's and naps"),
        ("1", "School", "#8E7CC3", "University related classes"),
        (
            "2",
            "Other Learning",
            "#674EA7",
            "Non-university related classes, Professional Learning, Getting tutored",
        ),
        ("3", "Exams", "#351C75", "Writing an exam"),
        (
            "4",
            "Studying",
            "#990000",
            "Productivity - Studying, Completing school work",
        ),
        (
            "5",
            "Side Projects",
            "#E06666",
            "Productivity - Side project grind, Professional clubs",
        ),
        (
            "6",
            "General Productivity",
            "#EA9999",
            "Productivity - Personal Administration, Research, Misc Preparation",
        ),
        ("7", "Work", "#00FF00", "Doing paid work / Volunteering"),
        (
            "8",
            "Job Search",
            "#6AA84F",
            "Searching for co-op jobs / filling out forms, interview prep/interviews",
        ),
        (
            "9",
            "Interneting",
            "#FF9900",
            "Reddit/Social Media, Anime, Entertainment",
        ),
        (
            "10",
            "Friends IRL",
            "#00FFFF",
            "Socialising with friends, parties",
        ),
        (
            "11",
            "Friends Online",
            "#45818E",
            "Messenger / Zoom / Discord / Phone Call",
        ),
        (
            "12",
            "Family",
            "#FF00FF",
            "Spending time with family / family gatherings",
        ),
        ("13", "Gaming", "#4A86E8", "Video games"),
        ("14", "Eating", "#9900FF", "Eating"),
        (
            "15",
            "Kitchening",
            "#8D3D9C",
            "Cooking, meal preps, doing dishes",
        ),
        ("16", "Well-being", "#C27BA0", "Chores, hygiene, religion, etc"),
        (
            "17",
            "Shopping",
            "#741B47",
            "Groceries, General Shopping, Gift, Online, etc.",
        ),
        (
            "18",
            "Travel",
            "#000000",
            "Commuting from place to place, Exploring",
        ),
        (
            "19",
            "Dating/Relationships",
            "#BC005F",
            "Going on Dates, Spending time with SO",
        ),
        (
            "20",
            "Wasted Time",
            "#7F6000",
            "Doing nothing, unproductive time, burnout, waiting, physically unable to do anything",
        ),
        (
            "21",
            "Exercise",
            "#FCE5CD",
            "Excercise and being physically active / Sports",
        ),
        (
            "22",
            "Events/Competitions",
            "#FF0000",
            "Participating in tournaments / competitions, attending official events",
        ),
        ("23", "Health", "#F6C8FF", "Haircuts / Doctor appointments"),
        (
            "24",
            "Hobbies",
            "#FFFF00",
            "Hobbies, personal development, activities alone, Fun Clubs, thinking / daydreaming",
        ),
    ];

    DEFAULTS
        .iter()
        .map(|(id, name, color, description)| Category {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        })
        .collect()
}
