use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::parse_timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Статус публикации поста.
pub enum PostStatus {
    /// Опубликован.
    Published,
    /// Черновик.
    Draft,
    /// Скрыт.
    Private,
    /// Статус, которого клиент не знает.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PostStatus {
    /// Значение для query-параметра `status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "PUBLISHED",
            Self::Draft => "DRAFT",
            Self::Private => "PRIVATE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLISHED" => Ok(Self::Published),
            "DRAFT" => Ok(Self::Draft),
            "PRIVATE" => Ok(Self::Private),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Пост блога.
pub struct PostItem {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Содержимое (markdown).
    pub content: String,
    /// Идентификатор категории.
    pub category_id: Option<i64>,
    /// Имя категории.
    pub category_name: String,
    /// Статус публикации.
    pub status: PostStatus,
    /// Дата создания в формате сервера.
    pub reg_date: String,
    /// Дата последнего изменения в формате сервера.
    pub modify_date: Option<String>,
}

impl PostItem {
    /// Дата создания, если сервер прислал её в понятном формате.
    pub fn registered_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.reg_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Запрос на создание или изменение поста.
pub struct PostWriteRequest {
    /// Заголовок.
    pub title: String,
    /// Содержимое (markdown).
    pub content: String,
    /// Категория поста.
    pub category_id: i64,
    /// Статус публикации.
    pub status: PostStatus,
}
