use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{
    Comment, CommentAdminDeleteRequest, CommentDeleteRequest, CommentModifyRequest,
    CommentWriteRequest,
};
use crate::page::Page;
use crate::request::RequestDescriptor;
use crate::shape::map_items;
use crate::transport::Transport;

use super::TypedRepository;

/// Комментарии: пользовательские операции и модерация.
#[derive(Debug)]
pub struct CommentRepository<T> {
    http: TypedRepository<T>,
}

impl<T> Clone for CommentRepository<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<T: Transport> CommentRepository<T> {
    /// Создаёт репозиторий.
    pub fn new(http: TypedRepository<T>) -> Self {
        Self { http }
    }

    /// Комментарии поста (корневые, с вложенными ответами).
    ///
    /// Каждый элемент массива отображается отдельно.
    pub async fn list(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        let descriptor = RequestDescriptor::new("/api/comments")
            .public()
            .query("postId", post_id);
        let raw: Value = self.http.fetch_one(descriptor).await?;
        Ok(map_items(raw))
    }

    /// Пишет комментарий или ответ.
    pub async fn write(&self, request: &CommentWriteRequest) -> ApiResult<Comment> {
        let descriptor = RequestDescriptor::new("/api/comments")
            .public()
            .json(request)?;
        self.http.create(descriptor).await
    }

    /// Изменяет свой комментарий (по паролю).
    pub async fn modify(&self, request: &CommentModifyRequest) -> ApiResult<Comment> {
        let descriptor = RequestDescriptor::new("/api/comments")
            .public()
            .json(request)?;
        self.http.update(descriptor).await
    }

    /// Удаляет свой комментарий (по паролю).
    pub async fn delete(&self, request: &CommentDeleteRequest) -> ApiResult<Value> {
        let descriptor = RequestDescriptor::new("/api/comments")
            .public()
            .json(request)?;
        self.http.remove(descriptor).await
    }

    /// Все комментарии постранично (админка).
    pub async fn admin_page(&self, page: u32, size: u32) -> ApiResult<Page<Comment>> {
        let descriptor = RequestDescriptor::new("/api/admin/comments")
            .query("page", page)
            .query("size", size);
        self.http.fetch_page(descriptor).await
    }

    /// Удаляет любой комментарий (админка).
    pub async fn admin_delete(&self, request: &CommentAdminDeleteRequest) -> ApiResult<Value> {
        let descriptor = RequestDescriptor::new("/api/admin/comments").json(request)?;
        self.http.remove(descriptor).await
    }
}
