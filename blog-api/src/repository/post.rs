use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{PostItem, PostStatus, PostWriteRequest};
use crate::page::Page;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

use super::TypedRepository;

#[derive(Debug, Clone, Default)]
/// Фильтр списка постов в админке.
pub struct AdminPostFilter {
    /// Только посты с этим статусом.
    pub status: Option<PostStatus>,
    /// Только посты этой категории.
    pub category_name: Option<String>,
}

/// Посты: публичная лента и управление в админке.
#[derive(Debug)]
pub struct PostRepository<T> {
    http: TypedRepository<T>,
}

impl<T> Clone for PostRepository<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<T: Transport> PostRepository<T> {
    /// Создаёт репозиторий.
    pub fn new(http: TypedRepository<T>) -> Self {
        Self { http }
    }

    /// Страница опубликованных постов.
    pub async fn page(&self, page: u32, size: u32) -> ApiResult<Page<PostItem>> {
        let descriptor = RequestDescriptor::new("/api/posts")
            .public()
            .query("page", page)
            .query("size", size);
        self.http.fetch_page(descriptor).await
    }

    /// Страница постов категории.
    pub async fn category_page(
        &self,
        category_name: &str,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<PostItem>> {
        let descriptor = RequestDescriptor::new("/api/posts/category")
            .public()
            .query("categoryName", category_name)
            .query("page", page)
            .query("size", size);
        self.http.fetch_page(descriptor).await
    }

    /// Один опубликованный пост.
    pub async fn single(&self, post_id: i64) -> ApiResult<PostItem> {
        let descriptor = RequestDescriptor::new("/api/posts/single")
            .public()
            .query("postId", post_id);
        self.http.fetch_one(descriptor).await
    }

    /// Страница постов любого статуса (админка).
    pub async fn admin_page(
        &self,
        filter: &AdminPostFilter,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<PostItem>> {
        let descriptor = RequestDescriptor::new("/api/admin/posts")
            .query("page", page)
            .query("size", size)
            .query_opt("status", filter.status.map(PostStatus::as_str))
            .query_opt("categoryName", filter.category_name.as_deref());
        self.http.fetch_page(descriptor).await
    }

    /// Один пост любого статуса (админка).
    pub async fn admin_single(&self, post_id: i64) -> ApiResult<PostItem> {
        self.http
            .fetch_one(RequestDescriptor::new(format!("/api/admin/posts/{post_id}")))
            .await
    }

    /// Создаёт пост.
    pub async fn create(&self, request: &PostWriteRequest) -> ApiResult<PostItem> {
        let descriptor = RequestDescriptor::new("/api/admin/posts").json(request)?;
        self.http.create(descriptor).await
    }

    /// Изменяет пост.
    pub async fn update(&self, post_id: i64, request: &PostWriteRequest) -> ApiResult<PostItem> {
        let descriptor =
            RequestDescriptor::new(format!("/api/admin/posts/{post_id}")).json(request)?;
        self.http.update(descriptor).await
    }

    /// Удаляет пост. Возвращает тело ответа как есть.
    pub async fn delete(&self, post_id: i64) -> ApiResult<Value> {
        self.http
            .remove(RequestDescriptor::new(format!("/api/admin/posts/{post_id}")))
            .await
    }
}
