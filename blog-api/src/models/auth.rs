use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Запрос на вход администратора.
pub struct LoginRequest {
    /// Логин.
    pub username: String,
    /// Пароль.
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Ответ после успешного входа. Сама сессия приходит в cookie.
pub struct LoginResponse {
    /// Идентификатор пользователя.
    pub user_id: i64,
    /// Логин.
    pub username: String,
    /// Сообщение сервера.
    pub message: String,
    /// Идентификатор сессии, если сервер дублирует его в теле.
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Ответ на выход.
pub struct LogoutResponse {
    /// Успешно ли завершена сессия.
    pub success: bool,
    /// Сообщение сервера.
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Результат проверки cookie-сессии на сервере.
pub struct AuthCheckResponse {
    /// Действительна ли сессия.
    pub authenticated: bool,
    /// Пользователь сессии, если сервер его сообщает.
    pub user_id: Option<i64>,
}
