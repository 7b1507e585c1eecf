use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, BlogClientResult, FailedResponse};
use crate::request::{FormPart, FormPayload, RequestBody, RequestDescriptor};
use crate::session::{SessionRecord, SessionStore};

/// Отправка запросов к API.
///
/// Реализация возвращает тело успешного ответа как есть, а любой сбой
/// (сеть, таймаут, не-2xx) уже нормализованным `ApiError`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Выполняет запрос и возвращает тело ответа.
    async fn send(&self, request: RequestDescriptor) -> ApiResult<Value>;
}

/// HTTP-транспорт на `reqwest` с cookie-сессией.
///
/// Cookie отправляются с каждым запросом независимо от `requires_auth`.
/// На 401 локальная сессия сбрасывается, а ошибка всё равно возвращается.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
    session: Arc<SessionStore>,
    session_cookie: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("session_cookie", &self.session_cookie)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Создаёт транспорт с базовым адресом и таймаутами из `config`.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> BlogClientResult<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            jar,
            session,
            session_cookie: config.session_cookie.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Кладёт cookie сохранённой сессии в jar (после перезапуска процесса).
    pub fn restore_session_cookie(&self, record: &SessionRecord) {
        let cookie = format!("{}={}; Path=/", self.session_cookie, record.session_id);
        self.jar.add_cookie_str(&cookie, &self.base_url);
    }

    /// Значение cookie сессии, выставленное сервером, если оно есть.
    pub fn session_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        header.split(';').map(str::trim).find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name == self.session_cookie && !value.is_empty()).then(|| value.to_string())
        })
    }

    /// Просрочивает cookie сессии в jar.
    pub fn forget_session_cookie(&self) {
        let cookie = format!("{}=; Path=/; Max-Age=0", self.session_cookie);
        self.jar.add_cookie_str(&cookie, &self.base_url);
    }

    pub(crate) fn build_request(&self, descriptor: &RequestDescriptor) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(descriptor.path());
        let mut request = self
            .client
            .request(descriptor.method().into(), url)
            .header(ACCEPT, "application/json");

        if !descriptor.query_params().is_empty() {
            request = request.query(descriptor.query_params());
        }

        // для multipart Content-Type с boundary выставляет сам reqwest
        request = match descriptor.body() {
            Some(RequestBody::Json(body)) => request.json(body),
            Some(RequestBody::Form(form)) => request.multipart(to_multipart(form)?),
            None => request,
        };

        Ok(request)
    }

    async fn invalidate_session(&self, path: &str) {
        warn!(path, "server rejected the session, dropping local session");
        self.forget_session_cookie();
        if let Err(err) = self.session.clear().await {
            warn!(error = %err, "failed to clear local session");
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> ApiResult<Value> {
        debug!(
            method = request.method().as_str(),
            path = request.path(),
            requires_auth = request.requires_auth(),
            "sending api request"
        );

        let response = self
            .build_request(&request)?
            .send()
            .await
            .map_err(|err| {
                warn!(path = request.path(), error = %err, "api request failed");
                ApiError::normalize(&FailedResponse {
                    status: err.status().map(|status| status.as_u16()),
                    body: None,
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            let failure = FailedResponse::new(status.as_u16(), read_error_body(response).await);
            if status == StatusCode::UNAUTHORIZED {
                self.invalidate_session(request.path()).await;
            }
            let err = ApiError::normalize(&failure);
            debug!(path = request.path(), status = err.status_code(), "api request rejected");
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(|err| {
            warn!(path = request.path(), error = %err, "failed to read response body");
            ApiError::normalize(&FailedResponse::network())
        })?;
        Ok(decode_body(&bytes))
    }
}

async fn read_error_body(response: Response) -> Option<Value> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn to_multipart(form: &FormPayload) -> ApiResult<Form> {
    let mut multipart = Form::new();
    for part in form.parts() {
        multipart = match part {
            FormPart::Text { name, value } => multipart.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime).map_err(|err| {
                        warn!(mime = mime.as_str(), error = %err, "invalid mime type for upload");
                        ApiError::from_status(400)
                    })?;
                }
                multipart.part(name.clone(), file)
            }
        };
    }
    Ok(multipart)
}
