use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Сырой неуспешный ответ транспорта до нормализации.
///
/// `status` отсутствует, если ответа не было вовсе (таймаут, DNS, обрыв
/// соединения). `body` отсутствует, если тело пустое или не является JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailedResponse {
    /// HTTP-статус ответа, если сервер ответил.
    pub status: Option<u16>,
    /// Тело ответа, разобранное как JSON.
    pub body: Option<Value>,
}

impl FailedResponse {
    /// Ответ со статусом и (возможно) JSON-телом.
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self {
            status: Some(status),
            body,
        }
    }

    /// Сбой без ответа сервера.
    pub fn network() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status_code} - {message}")]
/// Нормализованная ошибка запроса к API.
///
/// Создаётся ровно один раз на неуспешный запрос (на границе транспорта) и
/// дальше только читается.
pub struct ApiError {
    status_code: u16,
    message: String,
    code: Option<String>,
    validation: BTreeMap<String, String>,
}

/// Результат операций, которые ходят в API.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Превращает неуспешный ответ в `ApiError`.
    ///
    /// Если тело совпадает с форматом ошибки сервера (`message` строкой и
    /// `statusCode` числом), поля копируются как есть. Иначе сообщение
    /// берётся из фиксированной таблицы по HTTP-статусу (без статуса считается 500).
    pub fn normalize(failure: &FailedResponse) -> Self {
        if let Some(server) = failure.body.as_ref().and_then(Self::from_server_body) {
            return server;
        }
        Self::from_status(failure.status.unwrap_or(500))
    }

    /// Ошибка с сообщением из таблицы статусов.
    pub fn from_status(status_code: u16) -> Self {
        Self {
            status_code,
            message: default_message(status_code).to_string(),
            code: None,
            validation: BTreeMap::new(),
        }
    }

    fn from_server_body(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let message = object.get("message")?.as_str()?;
        let status_code = status_from_number(object.get("statusCode")?)?;

        let code = object
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string);

        let validation = object
            .get("validation")
            .or_else(|| object.get("validationErrors"))
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(field, text)| {
                        text.as_str().map(|text| (field.clone(), text.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            status_code,
            message: message.to_string(),
            code,
            validation,
        })
    }

    /// HTTP-статус ошибки.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Сообщение об ошибке (от сервера или из таблицы статусов).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Машинный код ошибки, если сервер его прислал.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Ошибки валидации по полям; пустая карта, если их нет.
    pub fn validation(&self) -> &BTreeMap<String, String> {
        &self.validation
    }

    /// `true` для 401: сессия на сервере недействительна.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    /// Текст уведомления для пользователя: `"{статус} - {сообщение}"` и,
    /// при наличии, вторая строка со всеми ошибками валидации.
    pub fn notice(&self) -> String {
        let mut notice = format!("{} - {}", self.status_code, self.message);
        if !self.validation.is_empty() {
            let details = self
                .validation
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            notice.push_str("\nvalidation: ");
            notice.push_str(&details);
        }
        notice
    }
}

fn status_from_number(value: &Value) -> Option<u16> {
    if let Some(status) = value.as_u64() {
        return u16::try_from(status).ok();
    }
    let status = value.as_f64()?;
    if status.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&status) {
        return Some(status as u16);
    }
    None
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "bad request",
        401 => "authentication required",
        403 => "forbidden",
        404 => "not found",
        500 => "internal server error",
        502 => "upstream unreachable",
        503 => "service unavailable",
        _ => "unknown network condition",
    }
}

#[derive(Debug, Error)]
/// Ошибки локального хранилища сессии.
pub enum StorageError {
    /// Ошибка ввода-вывода.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Не удалось сериализовать запись.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blog-api`.
pub enum BlogClientError {
    /// Ошибка запроса к API (уже нормализованная).
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Ошибка локального хранилища сессии.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Не удалось собрать HTTP-клиент (`reqwest`).
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Некорректная конфигурация клиента.
    #[error("invalid config: {0}")]
    Config(String),
}

/// Результат операций `blog-api`, не сводящихся к одному запросу.
pub type BlogClientResult<T> = Result<T, BlogClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_shaped_body_is_copied_verbatim() {
        let failure = FailedResponse::new(
            400,
            Some(json!({
                "message": "Invalid input",
                "statusCode": 422,
                "code": "POST_INVALID",
                "validation": { "title": "title is required" }
            })),
        );

        let err = ApiError::normalize(&failure);
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.message(), "Invalid input");
        assert_eq!(err.code(), Some("POST_INVALID"));
        assert_eq!(
            err.validation().get("title").map(String::as_str),
            Some("title is required")
        );
    }

    #[test]
    fn missing_validation_becomes_empty_map() {
        let failure = FailedResponse::new(
            404,
            Some(json!({ "message": "Not Found", "statusCode": 404 })),
        );

        let err = ApiError::normalize(&failure);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Not Found");
        assert!(err.code().is_none());
        assert!(err.validation().is_empty());
    }

    #[test]
    fn server_message_is_never_replaced_by_table() {
        let failure = FailedResponse::new(
            401,
            Some(json!({ "message": "session gone", "statusCode": 401 })),
        );
        assert_eq!(ApiError::normalize(&failure).message(), "session gone");
    }

    #[test]
    fn non_conforming_body_falls_back_to_status_table() {
        let cases = [
            (400, "bad request"),
            (401, "authentication required"),
            (403, "forbidden"),
            (404, "not found"),
            (500, "internal server error"),
            (502, "upstream unreachable"),
            (503, "service unavailable"),
            (418, "unknown network condition"),
        ];

        for (status, message) in cases {
            let failure = FailedResponse::new(status, Some(json!({ "error": "boom" })));
            let err = ApiError::normalize(&failure);
            assert_eq!(err.status_code(), status);
            assert_eq!(err.message(), message);
            assert!(err.validation().is_empty());
        }
    }

    #[test]
    fn string_status_code_is_not_server_shape() {
        let failure = FailedResponse::new(
            502,
            Some(json!({ "message": "proxy says no", "statusCode": "502" })),
        );
        let err = ApiError::normalize(&failure);
        assert_eq!(err.message(), "upstream unreachable");
    }

    #[test]
    fn network_failure_defaults_to_500() {
        let err = ApiError::normalize(&FailedResponse::network());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "internal server error");
    }

    #[test]
    fn normalize_is_deterministic() {
        let failure = FailedResponse::new(503, Some(json!("maintenance")));
        assert_eq!(ApiError::normalize(&failure), ApiError::normalize(&failure));
    }

    #[test]
    fn notice_lists_validation_messages_on_second_line() {
        let failure = FailedResponse::new(
            400,
            Some(json!({
                "message": "Bad Request",
                "statusCode": 400,
                "validation": { "content": "empty", "email": "invalid" }
            })),
        );

        let notice = ApiError::normalize(&failure).notice();
        assert_eq!(notice, "400 - Bad Request\nvalidation: empty, invalid");
    }

    #[test]
    fn notice_without_validation_is_single_line() {
        let err = ApiError::from_status(403);
        assert_eq!(err.notice(), "403 - forbidden");
        assert_eq!(err.to_string(), "403 - forbidden");
    }
}
