use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{ImageListResponse, ImageUpload, ImageUploadResponse};
use crate::request::RequestDescriptor;
use crate::transport::Transport;

use super::TypedRepository;

/// Изображения для постов (админка).
#[derive(Debug)]
pub struct ImageRepository<T> {
    http: TypedRepository<T>,
}

impl<T> Clone for ImageRepository<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<T: Transport> ImageRepository<T> {
    /// Создаёт репозиторий.
    pub fn new(http: TypedRepository<T>) -> Self {
        Self { http }
    }

    /// Загружает изображение multipart-формой.
    pub async fn upload(&self, upload: &ImageUpload) -> ApiResult<ImageUploadResponse> {
        let descriptor = RequestDescriptor::new("/api/admin/images").form(upload.to_form());
        self.http.submit_form(descriptor).await
    }

    /// Изображения в папке (или во всех, если папка не задана).
    pub async fn list(&self, folder: Option<&str>) -> ApiResult<ImageListResponse> {
        let descriptor = RequestDescriptor::new("/api/admin/images").query_opt("folder", folder);
        self.http.fetch_one(descriptor).await
    }

    /// Удаляет изображение. Возвращает тело ответа как есть.
    pub async fn delete(&self, public_id: &str) -> ApiResult<Value> {
        let descriptor = RequestDescriptor::new("/api/admin/images").query("publicId", public_id);
        self.http.remove(descriptor).await
    }
}
