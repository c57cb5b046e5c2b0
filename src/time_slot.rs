use std::fmt;

/// 30分単位の時刻キーを表す構造体。
///
/// 1日を48枠(00:00, 00:30, ..., 23:30)に区切ったときの1枠を指す。
/// 等価判定は時と分のみで行い、タイムゾーンはキーに含めない。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlotKey {
    hour: u8,
    minute: u8,
}

impl TimeSlotKey {
    /// 新しい`TimeSlotKey`を返す。
    ///
    /// 30分境界に揃っていない時刻(分が0でも30でもない)は`None`。
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour >= 24 || (minute != 0 && minute != 30) {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// 1日分48枠のキーを時刻昇順で返す。
    pub fn grid() -> Vec<Self> {
        (0..24)
            .flat_map(|hour| [Self { hour, minute: 0 }, Self { hour, minute: 30 }])
            .collect()
    }

    /// シリアライズされた時刻表現からキーを抽出する。
    ///
    /// `T14:30:00Z`や`T08:00:00+09:00`のような固定幅表現と、
    /// `14:30`・`14:30:00`のような素の時刻表現の両方を受け付ける。
    /// 解釈できない表現や30分境界に揃っていない時刻は`None`。
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.strip_prefix('T').unwrap_or(value);
        if value.get(2..3) != Some(":") {
            return None;
        }
        let hour: u8 = value.get(0..2)?.parse().ok()?;
        let minute: u8 = value.get(3..5)?.parse().ok()?;

        // 時分の後ろには秒とオフセットのみ許容する
        let rest = value.get(5..).unwrap_or("");
        if !rest.is_empty() && !rest.starts_with(':') {
            return None;
        }

        Self::new(hour, minute)
    }

    /// グリッド内の位置(0..=47)を返す。
    pub fn grid_index(&self) -> usize {
        self.hour as usize * 2 + (self.minute / 30) as usize
    }

    /// 12時間表記のチャートラベルを返す。
    pub fn to_clock12(&self) -> String {
        let (hour, meridiem) = match self.hour {
            0 => (12, "AM"),
            1..=11 => (self.hour, "AM"),
            12 => (12, "PM"),
            _ => (self.hour - 12, "PM"),
        };
        format!("{:02}:{:02} {}", hour, self.minute, meridiem)
    }

    /// 保存用の固定幅表現を返す。
    ///
    /// 日付はUTC正規化された暦日として保存されるため、オフセットは常に`+00:00`。
    pub fn to_entry_time(&self) -> String {
        format!("T{:02}:{:02}:00+00:00", self.hour, self.minute)
    }
}

impl fmt::Display for TimeSlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
