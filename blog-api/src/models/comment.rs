use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::parse_timestamp;
use crate::shape::lenient_vec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Комментарий с вложенными ответами.
///
/// Дерево строит сервер; каждый комментарий владеет своими `replies`.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Текст.
    pub content: String,
    /// Email автора.
    pub email: String,
    /// Пост, к которому относится комментарий.
    pub post_id: i64,
    /// Дата создания в формате сервера.
    pub reg_date: String,
    /// Родительский комментарий, если это ответ.
    pub parent_id: Option<i64>,
    /// Ответы на комментарий.
    #[serde(deserialize_with = "lenient_vec")]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Является ли комментарий ответом на другой.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Количество комментариев в ветке, включая этот.
    pub fn thread_len(&self) -> usize {
        1 + self.replies.iter().map(Comment::thread_len).sum::<usize>()
    }

    /// Дата создания, если сервер прислал её в понятном формате.
    pub fn registered_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.reg_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Новый комментарий (или ответ, если задан `parent_id`).
pub struct CommentWriteRequest {
    /// Текст.
    pub content: String,
    /// Email автора.
    pub email: String,
    /// Пароль для последующего изменения/удаления.
    pub password: String,
    /// Пост.
    pub post_id: i64,
    /// Родительский комментарий.
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Изменение комментария автором.
pub struct CommentModifyRequest {
    /// Комментарий.
    pub comment_id: i64,
    /// Новый текст.
    pub content: String,
    /// Email автора.
    pub email: String,
    /// Пароль, указанный при создании.
    pub password: String,
    /// Пост.
    pub post_id: i64,
    /// Родительский комментарий.
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Удаление комментария автором.
pub struct CommentDeleteRequest {
    /// Комментарий.
    pub comment_id: i64,
    /// Email автора.
    pub email: String,
    /// Пароль, указанный при создании.
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Удаление комментария администратором.
pub struct CommentAdminDeleteRequest {
    /// Комментарий.
    pub comment_id: i64,
    /// Текст удаляемого комментария.
    pub content: String,
    /// Email автора.
    pub email: String,
    /// Пост.
    pub post_id: i64,
    /// Родительский комментарий.
    pub parent_id: Option<i64>,
}

impl From<&Comment> for CommentAdminDeleteRequest {
    fn from(value: &Comment) -> Self {
        Self {
            comment_id: value.id,
            content: value.content.clone(),
            email: value.email.clone(),
            post_id: value.post_id,
            parent_id: value.parent_id,
        }
    }
}
