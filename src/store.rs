use std::env;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::record::{default_categories, Category, DayRecord};

#[cfg(test)]
use mockall::automock;

/// 記録の読み書きを行うリポジトリのtrait。
///
/// 同じ(ユーザー, 日付)への並行した書き込みは後勝ちで片方の更新が
/// 失われるため、呼び出し側で直列化すること。
#[cfg_attr(test, automock)]
pub trait RecordStore {
    /// カテゴリ一覧を取得する。
    async fn read_categories(&self) -> Result<Vec<Category>>;

    /// 指定ユーザーの全記録を取得する。
    ///
    /// # Arguments
    /// * `owner_id` - 記録の所有ユーザー
    async fn read_day_records(&self, owner_id: &str) -> Result<Vec<DayRecord>>;

    /// (ユーザー, 日付)をキーに記録を挿入または置換する。
    ///
    /// 枠一覧の統合は呼び出し側の責務で、渡された記録をそのまま保存する。
    async fn write_day_record(&self, record: DayRecord) -> Result<()>;
}

/// 全データを1つのJSONドキュメントとして保存するストア。
pub struct JsonStore {
    path: PathBuf,
}

/// ストアのドキュメント全体を表す構造体。
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    categories: Vec<Category>,
    days: Vec<DayRecord>,
}

impl JsonStore {
    /// 既定の保存先でストアを開く。
    ///
    /// 保存先は環境変数`SLOTLOG_STORE`が設定されていればそのパス、
    /// 未設定ならOSのデータディレクトリ配下の`slotlog/records.json`。
    pub fn open() -> Result<Self> {
        let path = match env::var("SLOTLOG_STORE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => dirs::data_dir()
                .context("Failed to resolve the user data directory")?
                .join("slotlog")
                .join("records.json"),
        };

        Ok(Self { path })
    }

    /// 指定した保存先でストアを開く。
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// ドキュメント全体を読み込む。
    ///
    /// ファイルがまだ無い場合は既定カテゴリ入りの空ドキュメントを返す。
    async fn load(&self) -> Result<StoreDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse store file: {}", self.path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("Store file not found, starting empty: {}", self.path.display());
                Ok(StoreDocument {
                    categories: default_categories(),
                    days: Vec::new(),
                })
            }
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read store file: {}", self.path.display())),
        }
    }

    /// ドキュメント全体を書き込む。
    async fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(document).context("Failed to serialize store document")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))
    }
}

impl RecordStore for JsonStore {
    async fn read_categories(&self) -> Result<Vec<Category>> {
        let document = self.load().await?;

        Ok(document.categories)
    }

    async fn read_day_records(&self, owner_id: &str) -> Result<Vec<DayRecord>> {
        let document = self.load().await?;

        Ok(document
            .days
            .into_iter()
            .filter(|record| record.owner_id == owner_id)
            .collect())
    }

    async fn write_day_record(&self, record: DayRecord) -> Result<()> {
        // 読み出しと書き戻しの間は排他しない。並行書き込みの直列化は
        // 呼び出し側の責務(traitの契約を参照)。
        let mut document = self.load().await?;

        match document
            .days
            .iter_mut()
            .find(|day| day.owner_id == record.owner_id && day.date == record.date)
        {
            Some(existing) => *existing = record,
            None => document.days.push(record),
        }

        self.save(&document).await
    }
}
