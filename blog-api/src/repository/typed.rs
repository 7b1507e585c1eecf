use std::sync::Arc;

use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::page::Page;
use crate::request::{HttpMethod, RequestDescriptor};
use crate::shape::{Shape, map_shape};
use crate::transport::Transport;

/// Обобщённый доступ к API: отправляет запрос и отображает ответ в модель.
///
/// Отображение никогда не падает; ошибка возможна только от транспорта и
/// пробрасывается без изменений. Чтобы получить тело как есть, используйте
/// `serde_json::Value` в качестве модели.
#[derive(Debug)]
pub struct TypedRepository<T> {
    transport: Arc<T>,
}

impl<T> Clone for TypedRepository<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> TypedRepository<T> {
    /// Создаёт репозиторий поверх транспорта.
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// `GET` и отображение ответа в `S`.
    pub async fn fetch_one<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<S> {
        self.send_mapped(descriptor.with_method(HttpMethod::Get)).await
    }

    /// `GET` постраничного списка.
    pub async fn fetch_page<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<Page<S>> {
        let raw = self
            .transport
            .send(descriptor.with_method(HttpMethod::Get))
            .await?;
        Ok(Page::from_raw(raw))
    }

    /// `POST` и отображение ответа в `S`.
    pub async fn create<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<S> {
        self.send_mapped(descriptor.with_method(HttpMethod::Post)).await
    }

    /// `PUT` и отображение ответа в `S`.
    pub async fn update<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<S> {
        self.send_mapped(descriptor.with_method(HttpMethod::Put)).await
    }

    /// `DELETE` и отображение ответа в `S`.
    pub async fn remove<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<S> {
        self.send_mapped(descriptor.with_method(HttpMethod::Delete))
            .await
    }

    /// `POST` multipart-формы. Запрос с другим телом не отправляется.
    pub async fn submit_form<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<S> {
        if !descriptor.is_multipart() {
            warn!(path = descriptor.path(), "submit_form called without multipart body");
            return Err(ApiError::from_status(400));
        }
        self.send_mapped(descriptor.with_method(HttpMethod::Post)).await
    }

    async fn send_mapped<S: Shape>(&self, descriptor: RequestDescriptor) -> ApiResult<S> {
        let raw = self.transport.send(descriptor).await?;
        Ok(map_shape(raw))
    }
}
