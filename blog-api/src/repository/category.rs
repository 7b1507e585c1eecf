use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{
    Category, CategoryCountListResponse, CategoryListResponse, CategoryRequest, CategoryWithCount,
};
use crate::request::RequestDescriptor;
use crate::transport::Transport;

use super::TypedRepository;

/// Категории постов.
#[derive(Debug)]
pub struct CategoryRepository<T> {
    http: TypedRepository<T>,
}

impl<T> Clone for CategoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<T: Transport> CategoryRepository<T> {
    /// Создаёт репозиторий.
    pub fn new(http: TypedRepository<T>) -> Self {
        Self { http }
    }

    /// Все категории.
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        let response: CategoryListResponse = self
            .http
            .fetch_one(RequestDescriptor::new("/api/categories").public())
            .await?;
        Ok(response.category_responses)
    }

    /// Все категории с количеством постов.
    pub async fn list_with_count(&self) -> ApiResult<Vec<CategoryWithCount>> {
        let response: CategoryCountListResponse = self
            .http
            .fetch_one(RequestDescriptor::new("/api/categories/stats").public())
            .await?;
        Ok(response.category_with_count_responses)
    }

    /// Создаёт категорию.
    pub async fn create(&self, name: &str) -> ApiResult<Category> {
        let descriptor = RequestDescriptor::new("/api/admin/categories").json(&CategoryRequest {
            name: name.to_string(),
        })?;
        self.http.create(descriptor).await
    }

    /// Переименовывает категорию.
    pub async fn rename(&self, category_id: i64, name: &str) -> ApiResult<Category> {
        let descriptor = RequestDescriptor::new(format!("/api/admin/categories/{category_id}"))
            .json(&CategoryRequest {
                name: name.to_string(),
            })?;
        self.http.update(descriptor).await
    }

    /// Удаляет категорию. Возвращает тело ответа как есть.
    pub async fn delete(&self, category_id: i64) -> ApiResult<Value> {
        self.http
            .remove(RequestDescriptor::new(format!(
                "/api/admin/categories/{category_id}"
            )))
            .await
    }
}
