use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// HTTP-метод запроса к API.
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Имя метода в верхнем регистре.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Часть multipart-формы.
pub enum FormPart {
    /// Текстовое поле.
    Text {
        /// Имя поля.
        name: String,
        /// Значение.
        value: String,
    },
    /// Файл.
    File {
        /// Имя поля.
        name: String,
        /// Имя файла, которое увидит сервер.
        file_name: String,
        /// MIME-тип, если известен.
        mime: Option<String>,
        /// Содержимое.
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Бинарная multipart-форма (загрузка файлов).
pub struct FormPayload {
    parts: Vec<FormPart>,
}

impl FormPayload {
    /// Пустая форма.
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет текстовое поле.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Добавляет файл.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes,
        });
        self
    }

    /// Части формы в порядке добавления.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Тело запроса.
pub enum RequestBody {
    /// Структурированное JSON-тело.
    Json(Value),
    /// Multipart-форма.
    Form(FormPayload),
}

#[derive(Debug, Clone, PartialEq)]
/// Описание одного запроса к API: метод, путь, query-параметры и тело.
///
/// `requires_auth` используется только для логов: cookie сессии отправляются всегда.
pub struct RequestDescriptor {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    requires_auth: bool,
}

impl RequestDescriptor {
    /// Запрос к `path` без параметров (метод по умолчанию `GET`).
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
            requires_auth: true,
        }
    }

    /// Задаёт HTTP-метод.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Добавляет query-параметр.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Добавляет query-параметр, если значение есть.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// JSON-тело из сериализуемого значения.
    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|_| ApiError::from_status(400))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Multipart-тело.
    pub fn form(mut self, form: FormPayload) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    /// Помечает запрос как публичный. Влияет только на логирование.
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// HTTP-метод.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Путь относительно базового URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query-параметры в порядке добавления.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Тело запроса.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Требует ли запрос авторизации (справочно).
    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// `true`, если тело является multipart-формой.
    pub fn is_multipart(&self) -> bool {
        matches!(self.body, Some(RequestBody::Form(_)))
    }
}
