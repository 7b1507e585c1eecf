use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shape::{Shape, map_items, map_shape};

#[derive(Debug, Clone, PartialEq)]
/// Страница коллекции с параметрами пагинации, как их вернул сервер.
pub struct Page<T> {
    /// Элементы текущей страницы.
    pub items: Vec<T>,
    /// Номер страницы (с нуля).
    pub page_number: u32,
    /// Размер страницы.
    pub page_size: u32,
    /// Общее количество элементов.
    pub total_elements: u64,
    /// Общее количество страниц.
    pub total_pages: u32,
    /// Первая ли это страница.
    pub is_first: bool,
    /// Последняя ли это страница.
    pub is_last: bool,
}

impl<T> Page<T> {
    /// `true`, если на странице нет элементов.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Номер следующей страницы, если она есть.
    pub fn next_page(&self) -> Option<u32> {
        if self.is_last {
            return None;
        }
        self.page_number.checked_add(1)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        let meta = PageMeta::default();
        Self::from_meta(meta, Vec::new())
    }
}

impl<T> Page<T> {
    fn from_meta(meta: PageMeta, items: Vec<T>) -> Self {
        Self {
            items,
            page_number: meta.page_number,
            page_size: meta.page_size,
            total_elements: meta.total_elements,
            total_pages: meta.total_pages,
            is_first: meta.first,
            is_last: meta.last,
        }
    }
}

impl<T: Shape> Page<T> {
    /// Собирает страницу из сырого тела ответа.
    ///
    /// Скаляры копируются как есть. Элементы ищутся в `content`, затем в
    /// `items`; каждый отображается отдельно. Без массива страница пустая.
    pub fn from_raw(raw: Value) -> Self {
        let items = ["content", "items"]
            .iter()
            .find_map(|key| raw.get(*key).filter(|items| items.is_array()))
            .cloned()
            .map(map_items)
            .unwrap_or_default();

        let meta = map_shape::<PageMeta>(raw);
        Self::from_meta(meta, items)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PageMeta {
    page_number: u32,
    page_size: u32,
    total_elements: u64,
    total_pages: u32,
    first: bool,
    last: bool,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: 10,
            total_elements: 0,
            total_pages: 0,
            first: true,
            last: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Item {
        id: i64,
    }

    #[test]
    fn maps_content_and_scalars_verbatim() {
        let page = Page::<Item>::from_raw(json!({
            "content": [{ "id": 1 }, { "id": 2 }],
            "pageNumber": 1,
            "pageSize": 2,
            "totalElements": 5,
            "totalPages": 3,
            "first": false,
            "last": false
        }));

        assert_eq!(page.items, vec![Item { id: 1 }, Item { id: 2 }]);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_size, 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(!page.is_first);
        assert!(!page.is_last);
        assert_eq!(page.next_page(), Some(2));
    }

    #[test]
    fn accepts_items_key() {
        let page = Page::<Item>::from_raw(json!({
            "items": [{ "id": 7 }],
            "pageNumber": 0,
            "pageSize": 10,
            "totalElements": 1,
            "totalPages": 1,
            "first": true,
            "last": true
        }));

        assert_eq!(page.items, vec![Item { id: 7 }]);
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn missing_or_non_array_items_give_empty_page() {
        let missing = Page::<Item>::from_raw(json!({
            "pageNumber": 2,
            "pageSize": 20,
            "totalElements": 41,
            "totalPages": 3,
            "first": false,
            "last": true
        }));
        assert!(missing.is_empty());
        assert_eq!(missing.page_number, 2);
        assert_eq!(missing.page_size, 20);
        assert_eq!(missing.total_elements, 41);

        let not_array = Page::<Item>::from_raw(json!({
            "content": { "id": 1 },
            "pageNumber": 0,
            "pageSize": 10
        }));
        assert!(not_array.is_empty());
        assert_eq!(not_array.page_size, 10);
    }

    #[test]
    fn bad_items_are_mapped_independently() {
        let page = Page::<Item>::from_raw(json!({
            "content": [{ "id": 1 }, "garbage", { "id": "x" }]
        }));
        assert_eq!(page.items, vec![Item { id: 1 }, Item::default(), Item::default()]);
    }

    #[test]
    fn next_page_stops_at_the_last_page_number() {
        let page = Page::<Item>::from_raw(json!({
            "pageNumber": u32::MAX,
            "last": false
        }));
        assert_eq!(page.page_number, u32::MAX);
        assert!(!page.is_last);
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn empty_body_gives_default_page() {
        let page = Page::<Item>::from_raw(Value::Null);
        assert_eq!(page, Page::default());
        assert_eq!(page.page_size, 10);
        assert!(page.is_first && page.is_last);
    }
}
