//! Клиентская библиотека для REST API блога и его админки.
//!
//! Предоставляет единый API (`BlogClient`) поверх HTTP-транспорта (`reqwest`):
//! - типизированные репозитории ресурсов (посты, категории, комментарии,
//!   изображения, авторизация);
//! - нормализацию ошибок сервера и сети в `ApiError`;
//! - локальную сессию (`SessionStore`) и проверку доступа (`AuthGate`).
//!
//! Авторизация построена на cookie-сессии: после `login` клиент сохраняет
//! запись сессии локально и восстанавливает cookie при следующем запуске.
#![warn(missing_docs)]

mod config;
mod error;
mod gate;
mod page;
mod request;
mod session;
mod shape;
mod storage;
mod transport;

pub mod models;
pub mod repository;

#[cfg(test)]
mod testing;

pub use config::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_LOGIN_PATH, DEFAULT_SESSION_COOKIE,
    DEFAULT_TIMEOUT,
};
pub use error::{
    ApiError, ApiResult, BlogClientError, BlogClientResult, FailedResponse, StorageError,
};
pub use gate::{AuthGate, GateState, GateUi, LOGIN_REQUIRED_NOTICE, SESSION_EXPIRED_NOTICE};
pub use page::Page;
pub use request::{FormPart, FormPayload, HttpMethod, RequestBody, RequestDescriptor};
pub use session::{SESSION_KEY, SessionRecord, SessionStore};
pub use shape::{Shape, map_shape};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{HttpTransport, Transport};

use std::sync::Arc;

use tracing::{info, warn};

use models::{LoginRequest, LoginResponse, LogoutResponse};
use repository::{
    AuthRepository, CategoryRepository, CommentRepository, ImageRepository, PostRepository,
    TypedRepository,
};

/// Клиент блога: собирает транспорт, сессию и репозитории один раз при старте.
pub struct BlogClient {
    config: ClientConfig,
    session: Arc<SessionStore>,
    transport: Arc<HttpTransport>,
    auth: AuthRepository<HttpTransport>,
    posts: PostRepository<HttpTransport>,
    categories: CategoryRepository<HttpTransport>,
    comments: CommentRepository<HttpTransport>,
    images: ImageRepository<HttpTransport>,
}

impl std::fmt::Debug for BlogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogClient")
            .field("base_url", &self.config.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BlogClient {
    /// Создаёт клиент, читает сохранённую сессию из `storage` и
    /// восстанавливает её cookie.
    pub async fn connect(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> BlogClientResult<Self> {
        let session = Arc::new(SessionStore::new(storage));
        let transport = Arc::new(HttpTransport::new(&config, session.clone())?);

        if let Some(record) = session.load().await {
            transport.restore_session_cookie(&record);
            info!(user_id = record.user_id, "restored local session");
        }

        let http = TypedRepository::new(transport.clone());
        Ok(Self {
            config,
            session,
            transport,
            auth: AuthRepository::new(http.clone()),
            posts: PostRepository::new(http.clone()),
            categories: CategoryRepository::new(http.clone()),
            comments: CommentRepository::new(http.clone()),
            images: ImageRepository::new(http),
        })
    }

    /// Настройки клиента.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Локальная сессия.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Авторизация.
    pub fn auth(&self) -> &AuthRepository<HttpTransport> {
        &self.auth
    }

    /// Посты.
    pub fn posts(&self) -> &PostRepository<HttpTransport> {
        &self.posts
    }

    /// Категории.
    pub fn categories(&self) -> &CategoryRepository<HttpTransport> {
        &self.categories
    }

    /// Комментарии.
    pub fn comments(&self) -> &CommentRepository<HttpTransport> {
        &self.comments
    }

    /// Изображения.
    pub fn images(&self) -> &ImageRepository<HttpTransport> {
        &self.images
    }

    /// Гейт для защищённых разделов с заданным интерфейсом пользователя.
    pub fn gate(&self, ui: Arc<dyn GateUi>) -> AuthGate<HttpTransport> {
        AuthGate::new(
            self.auth.clone(),
            self.session.clone(),
            ui,
            self.config.login_path.clone(),
        )
    }

    /// Выполняет вход и сохраняет запись сессии локально.
    ///
    /// Идентификатор сессии берётся из cookie, а если сервер её не выставил,
    /// из тела ответа.
    pub async fn login(&self, username: &str, password: &str) -> BlogClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.auth.login(&request).await?;

        let session_id = self
            .transport
            .session_cookie()
            .or_else(|| response.session_id.clone())
            .filter(|id| !id.trim().is_empty());

        match session_id {
            Some(session_id) => {
                self.session
                    .save(SessionRecord::new(session_id, response.user_id))
                    .await?;
                info!(user_id = response.user_id, "logged in");
            }
            None => warn!("login succeeded but server did not issue a session id"),
        }

        Ok(response)
    }

    /// Завершает сессию на сервере и всегда сбрасывает локальную.
    pub async fn logout(&self) -> BlogClientResult<LogoutResponse> {
        let result = self.auth.logout().await;

        self.transport.forget_session_cookie();
        self.session.clear().await?;

        Ok(result?)
    }
}
