use crate::error::ApiResult;
use crate::models::{AuthCheckResponse, LoginRequest, LoginResponse, LogoutResponse};
use crate::request::RequestDescriptor;
use crate::transport::Transport;

use super::TypedRepository;

/// Вход, выход и проверка cookie-сессии.
#[derive(Debug)]
pub struct AuthRepository<T> {
    http: TypedRepository<T>,
}

impl<T> Clone for AuthRepository<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<T: Transport> AuthRepository<T> {
    /// Создаёт репозиторий.
    pub fn new(http: TypedRepository<T>) -> Self {
        Self { http }
    }

    /// Вход администратора. Сервер выставляет cookie сессии.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let descriptor = RequestDescriptor::new("/api/auth/login")
            .public()
            .json(request)?;
        self.http.create(descriptor).await
    }

    /// Завершает серверную сессию.
    pub async fn logout(&self) -> ApiResult<LogoutResponse> {
        self.http.create(RequestDescriptor::new("/api/logout")).await
    }

    /// Спрашивает у сервера, действительна ли текущая сессия.
    pub async fn check_authentication(&self) -> ApiResult<bool> {
        let response: AuthCheckResponse = self
            .http
            .fetch_one(RequestDescriptor::new("/api/auth/session"))
            .await?;
        Ok(response.authenticated)
    }
}
