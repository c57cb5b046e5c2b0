use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::metrics::BreakdownRow;
use crate::record::TimeSlotEntry;

/// Consoleに集計結果を表示するためのtrait。
pub trait ConsolePresenter {
    /// チャート用の(ラベル, 値)系列を表示する。
    ///
    /// # Arguments
    ///
    /// * `title` - 系列の見出し
    /// * `series` - 表示する系列
    fn show_series(&mut self, title: &str, series: &[(String, f64)]) -> Result<()>;

    /// 年間のカテゴリ別内訳を表示する。
    fn show_breakdown(&mut self, year: i32, rows: &[BreakdownRow]) -> Result<()>;

    /// 1日分のタイムラインを表示する。
    fn show_timeline(&mut self, date: NaiveDate, slots: &[TimeSlotEntry]) -> Result<()>;
}

/// 集計結果をMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // 系列をlist形式で表示する。
    fn show_series(&mut self, title: &str, series: &[(String, f64)]) -> Result<()> {
        writeln!(self.writer, "## {}", title)
            .with_context(|| format!("Failed to write series title: {}", title))?;
        for (label, value) in series {
            writeln!(self.writer, "- {}: {:.2}", label, value)
                .with_context(|| format!("Failed to write series point: {}", label))?;
        }

        Ok(())
    }

    // 内訳を時間と割合付きのlist形式で表示する。
    fn show_breakdown(&mut self, year: i32, rows: &[BreakdownRow]) -> Result<()> {
        writeln!(self.writer, "## {}", year)
            .with_context(|| format!("Failed to write breakdown title: {}", year))?;
        for row in rows {
            writeln!(
                self.writer,
                "- {}: {:.2} ({:.1}%)",
                row.category.name, row.hours, row.percentage
            )
            .with_context(|| format!("Failed to write breakdown row: {}", row.category.name))?;
        }

        Ok(())
    }

    // タイムラインを12時間表記のlist形式で表示する。
    fn show_timeline(&mut self, date: NaiveDate, slots: &[TimeSlotEntry]) -> Result<()> {
        writeln!(self.writer, "## {}", date)
            .with_context(|| format!("Failed to write timeline title: {}", date))?;
        for slot in slots {
            let time_label = slot
                .slot_key()
                .map(|key| key.to_clock12())
                .unwrap_or_else(|| slot.time.clone());
            writeln!(self.writer, "- {}: {}", time_label, slot.category)
                .with_context(|| format!("Failed to write timeline slot: {:?}", slot))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::ConsoleMarkdownList;
    use super::ConsolePresenter;
    use crate::metrics::BreakdownRow;
    use crate::record::{Category, TimeSlotEntry};

    /// 系列が見出しとlist形式で出力されることを確認する。
    #[test]
    fn test_show_series() {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);
        let series = vec![("1".to_string(), 0.5), ("2".to_string(), 0.0)];

        presenter
            .show_series("Total Sleep Hours by Weeks", &series)
            .unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "## Total Sleep Hours by Weeks\n- 1: 0.50\n- 2: 0.00\n"
        );
    }

    /// 内訳が時間と割合付きで出力されることを確認する。
    #[test]
    fn test_show_breakdown() {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);
        let rows = vec![BreakdownRow {
            category: Category {
                id: "0".to_string(),
                name: "Sleep".to_string(),
                color: "#666666".to_string(),
                description: String::new(),
            },
            hours: 1.5,
            percentage: 75.0,
        }];

        presenter.show_breakdown(2024, &rows).unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "## 2024\n- Sleep: 1.50 (75.0%)\n"
        );
    }

    /// タイムラインが12時間表記で出力されることを確認する。
    #[test]
    fn test_show_timeline() {
        let mut writer = Vec::new();
        let mut presenter = ConsoleMarkdownList::new(&mut writer);
        let slots = vec![
            TimeSlotEntry {
                category: "Sleep".to_string(),
                time: "T00:00:00+00:00".to_string(),
                timezone: "UTC".to_string(),
            },
            TimeSlotEntry {
                category: String::new(),
                time: "T14:30:00+00:00".to_string(),
                timezone: "UTC".to_string(),
            },
        ];

        presenter
            .show_timeline(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), &slots)
            .unwrap();

        assert_eq!(
            String::from_utf8(writer).unwrap(),
            "## 2024-01-03\n- 12:00 AM: Sleep\n- 02:30 PM: \n"
        );
    }
}
