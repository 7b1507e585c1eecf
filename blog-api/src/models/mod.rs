//! Модели ресурсов блога в том виде, в каком их отдаёт сервер (camelCase).
//!
//! Все модели ответов помечены `#[serde(default)]`: отсутствующие поля
//! получают значения по умолчанию.

mod auth;
mod category;
mod comment;
mod image;
mod post;

pub use auth::{AuthCheckResponse, LoginRequest, LoginResponse, LogoutResponse};
pub use category::{
    Category, CategoryCountListResponse, CategoryListResponse, CategoryRequest, CategoryWithCount,
};
pub use comment::{
    Comment, CommentAdminDeleteRequest, CommentDeleteRequest, CommentModifyRequest,
    CommentWriteRequest,
};
pub use image::{ImageItem, ImageListResponse, ImageUpload, ImageUploadResponse};
pub use post::{PostItem, PostStatus, PostWriteRequest};

use chrono::{DateTime, NaiveDateTime};

const LOCAL_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Разбирает дату из ответа сервера: RFC 3339 (приводится к UTC) или
/// `LocalDateTime` без часового пояса.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
