use serde::{Deserialize, Serialize};

use crate::shape::lenient_vec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Категория постов.
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Имя категории.
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Категория с количеством постов в ней.
pub struct CategoryWithCount {
    /// Идентификатор категории.
    pub id: i64,
    /// Имя категории.
    pub name: String,
    /// Количество постов.
    pub post_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Ответ со списком категорий.
pub struct CategoryListResponse {
    /// Категории.
    #[serde(deserialize_with = "lenient_vec")]
    pub category_responses: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Ответ со списком категорий и количеством постов.
pub struct CategoryCountListResponse {
    /// Категории с количеством постов (сервер пишет ключ с заглавной буквы).
    #[serde(rename = "CategoryWithCountResponses", deserialize_with = "lenient_vec")]
    pub category_with_count_responses: Vec<CategoryWithCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Создание или переименование категории.
pub struct CategoryRequest {
    /// Имя категории.
    pub name: String,
}
