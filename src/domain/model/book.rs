use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

/// 受け付ける出版年の下限。上限は現在の年。
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// プレゼンテーション層向けのジャンル候補。Storeは任意の文字列を受け付ける。
pub const SUGGESTED_GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Science",
    "Technology",
    "Fantasy",
    "Romance",
    "Poetry",
    "Self-help",
    "Art",
    "Religion",
    "History",
    "Programming",
    "Productivity",
    "Machine Learning",
    "Others",
];

/// 書籍追加リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: Option<i32>,
    pub genre: String,
    pub read_status: bool,
}

impl NewBook {
    /// 必須項目・改行の有無・出版年の範囲を検証する。
    pub fn validate(&self, current_year: i32) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyField("title"));
        }
        if self.author.trim().is_empty() {
            return Err(DomainError::EmptyField("author"));
        }
        for (name, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
        ] {
            if value.contains(['\n', '\r']) {
                return Err(DomainError::MultiLineField(name));
            }
        }
        if let Some(year) = self.publication_year {
            if !(MIN_PUBLICATION_YEAR..=current_year).contains(&year) {
                return Err(DomainError::YearOutOfRange {
                    year,
                    max: current_year,
                });
            }
        }
        Ok(())
    }
}

/// 蔵書1冊分のレコード。`added_date` は作成時に一度だけ設定される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    title: String,
    author: String,
    /// 欠落・非数値のデータは `None` として読み込む
    #[serde(default, deserialize_with = "lenient_year")]
    publication_year: Option<i32>,
    genre: String,
    read_status: bool,
    #[serde(with = "added_date_format")]
    added_date: NaiveDateTime,
}

impl Book {
    /// 永続化フォーマットに合わせて秒未満は切り捨てる。
    pub fn new(req: NewBook, added_date: NaiveDateTime) -> Self {
        Self {
            title: req.title,
            author: req.author,
            publication_year: req.publication_year,
            genre: req.genre,
            read_status: req.read_status,
            added_date: added_date.with_nanosecond(0).unwrap_or(added_date),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication_year(&self) -> Option<i32> {
        self.publication_year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read_status
    }

    pub fn added_date(&self) -> NaiveDateTime {
        self.added_date
    }

    pub(crate) fn set_read_status(&mut self, read_status: bool) {
        self.read_status = read_status;
    }
}

/// ローカル時刻の現在値。
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn current_year() -> i32 {
    Local::now().year()
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let year = match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64))
            .and_then(|y| i32::try_from(y).ok()),
        _ => None,
    };
    Ok(year)
}

mod added_date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
