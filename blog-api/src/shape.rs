//! Отображение сырого JSON в типизированные модели.
//!
//! Отображение тотальное: неизвестные поля отбрасываются, отсутствующие
//! получают значения по умолчанию, а поля с неподходящим типом остаются со
//! значением по умолчанию вместо ошибки.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

/// Тип, в который можно отобразить ответ API.
///
/// `serde_json::Value` тоже подходит и возвращает тело без изменений.
pub trait Shape: DeserializeOwned + Serialize + Default {}

impl<T> Shape for T where T: DeserializeOwned + Serialize + Default {}

/// Отображает `raw` в `T`, никогда не возвращая ошибку.
pub fn map_shape<T: Shape>(raw: Value) -> T {
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(value) => value,
        Err(err) => {
            debug!(
                shape = std::any::type_name::<T>(),
                error = %err,
                "strict decode failed, mapping field by field"
            );
            map_fields(raw)
        }
    }
}

/// Отображает каждый элемент массива отдельно; не-массив даёт пустой список.
pub(crate) fn map_items<T: Shape>(raw: Value) -> Vec<T> {
    match raw {
        Value::Array(items) => items.into_iter().map(map_shape).collect(),
        _ => Vec::new(),
    }
}

/// `deserialize_with` для вложенных списков моделей: один неподходящий
/// элемент не обнуляет весь список.
pub(crate) fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Shape,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(map_items(raw))
}

// Накладывает совпадающие по имени поля на `T::default()`, оставляя только те,
// с которыми значение по-прежнему декодируется.
fn map_fields<T: Shape>(raw: Value) -> T {
    let Value::Object(fields) = raw else {
        return T::default();
    };
    let mut base = match serde_json::to_value(T::default()) {
        Ok(Value::Object(base)) => base,
        _ => return T::default(),
    };

    for (key, value) in fields {
        let Some(previous) = base.get(&key).cloned() else {
            continue;
        };
        base.insert(key.clone(), value);
        if !decodes::<T>(&base) {
            base.insert(key, previous);
        }
    }

    serde_json::from_value(Value::Object(base)).unwrap_or_default()
}

fn decodes<T: Shape>(candidate: &Map<String, Value>) -> bool {
    serde_json::from_value::<T>(Value::Object(candidate.clone())).is_ok()
}
