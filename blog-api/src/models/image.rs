use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::parse_timestamp;
use crate::request::FormPayload;
use crate::shape::lenient_vec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Загруженное изображение.
pub struct ImageItem {
    /// Исходное имя файла.
    pub original_filename: String,
    /// Высота в пикселях.
    pub height: u32,
    /// Ширина в пикселях.
    pub width: u32,
    /// Дата загрузки в формате сервера.
    pub created_at: String,
    /// Размер в байтах.
    pub bytes: u64,
    /// Идентификатор в хранилище изображений.
    pub public_id: String,
    /// Формат (`png`, `jpg`, ...).
    pub format: String,
    /// Публичный HTTPS-адрес.
    pub secure_url: String,
}

impl ImageItem {
    /// Дата загрузки, если сервер прислал её в понятном формате.
    pub fn created(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Список изображений в папке.
pub struct ImageListResponse {
    /// Успешен ли запрос.
    pub success: bool,
    /// Сообщение сервера.
    pub message: String,
    /// Папка.
    pub folder: String,
    /// Изображения.
    #[serde(deserialize_with = "lenient_vec")]
    pub images: Vec<ImageItem>,
    /// Количество изображений.
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Результат загрузки изображения.
pub struct ImageUploadResponse {
    /// Успешна ли загрузка.
    pub success: bool,
    /// Сообщение сервера.
    pub message: String,
    /// Публичный HTTPS-адрес.
    pub secure_url: String,
    /// Идентификатор в хранилище изображений.
    pub public_id: String,
    /// Исходное имя файла.
    pub original_filename: String,
    /// Формат.
    pub format: String,
    /// Размер в байтах.
    pub bytes: u64,
    /// Ширина в пикселях.
    pub width: u32,
    /// Высота в пикселях.
    pub height: u32,
}

#[derive(Debug, Clone, Default)]
/// Файл для загрузки и папка назначения.
pub struct ImageUpload {
    /// Имя файла.
    pub file_name: String,
    /// MIME-тип, если известен.
    pub mime: Option<String>,
    /// Содержимое файла; без него поле `file` не отправляется.
    pub bytes: Option<Vec<u8>>,
    /// Папка назначения.
    pub folder: Option<String>,
}

impl ImageUpload {
    /// Multipart-форма с полями `file` и `folder` (только заданные).
    pub fn to_form(&self) -> FormPayload {
        let mut form = FormPayload::new();
        if let Some(bytes) = &self.bytes {
            form = form.file("file", self.file_name.clone(), self.mime.clone(), bytes.clone());
        }
        if let Some(folder) = self.folder.as_deref().filter(|folder| !folder.is_empty()) {
            form = form.text("folder", folder);
        }
        form
    }
}
