use std::time::Duration;

use reqwest::Url;

use crate::error::{BlogClientError, BlogClientResult};

/// Таймаут запроса по умолчанию.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
/// Таймаут установки соединения по умолчанию.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
/// Имя cookie серверной сессии по умолчанию (Spring Session).
pub const DEFAULT_SESSION_COOKIE: &str = "SESSION";
/// Путь страницы входа, куда отправляет `AuthGate`.
pub const DEFAULT_LOGIN_PATH: &str = "/admin/login";

#[derive(Debug, Clone)]
/// Настройки клиента API.
pub struct ClientConfig {
    /// Базовый адрес API, например `http://127.0.0.1:8080`.
    pub base_url: Url,
    /// Таймаут всего запроса.
    pub timeout: Duration,
    /// Таймаут установки соединения.
    pub connect_timeout: Duration,
    /// Имя cookie, в котором сервер держит идентификатор сессии.
    pub session_cookie: String,
    /// Куда направлять пользователя, если сессии нет.
    pub login_path: String,
}

impl ClientConfig {
    /// Настройки по умолчанию для базового адреса `base_url`.
    pub fn new(base_url: &str) -> BlogClientResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| BlogClientError::Config(format!("invalid base url '{base_url}': {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(BlogClientError::Config(format!(
                "base url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        })
    }

    /// Задаёт таймаут запроса.
    pub fn with_timeout(mut self, timeout: Duration) -> BlogClientResult<Self> {
        if timeout.is_zero() {
            return Err(BlogClientError::Config("timeout must be > 0".to_string()));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Задаёт имя cookie сессии.
    pub fn with_session_cookie(mut self, name: impl Into<String>) -> BlogClientResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() || name.contains(['=', ';', ' ']) {
            return Err(BlogClientError::Config(format!(
                "invalid session cookie name '{name}'"
            )));
        }
        self.session_cookie = name;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = ClientConfig::new("http://localhost:8080").expect("config must be valid");
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.session_cookie, "SESSION");
        assert_eq!(config.login_path, "/admin/login");
    }

    #[test]
    fn new_rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://example.com").expect_err("must be rejected");
        assert!(matches!(err, BlogClientError::Config(_)));
    }

    #[test]
    fn new_rejects_garbage() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ClientConfig::new("http://localhost").expect("config must be valid");
        assert!(config.with_timeout(Duration::ZERO).is_err());
    }

    #[test]
    fn cookie_name_is_validated() {
        let config = ClientConfig::new("http://localhost").expect("config must be valid");
        assert!(config.clone().with_session_cookie("JSESSIONID").is_ok());
        assert!(config.with_session_cookie("a=b").is_err());
    }
}
