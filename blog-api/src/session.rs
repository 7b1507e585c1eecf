use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Ключ, под которым запись сессии лежит в локальном хранилище.
pub const SESSION_KEY: &str = "blog_session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Локальное подтверждение авторизованной сессии.
pub struct SessionRecord {
    /// Идентификатор серверной сессии (значение cookie).
    pub session_id: String,
    /// Идентификатор пользователя.
    pub user_id: i64,
}

impl SessionRecord {
    /// Создаёт запись сессии.
    pub fn new(session_id: impl Into<String>, user_id: i64) -> Self {
        Self {
            session_id: session_id.into(),
            user_id,
        }
    }
}

fn parse_record(raw: &str) -> Option<SessionRecord> {
    let record = serde_json::from_str::<SessionRecord>(raw).ok()?;
    if record.session_id.trim().is_empty() {
        return None;
    }
    Some(record)
}

/// Текущая сессия и её копия в локальном хранилище.
///
/// Мьютекс держится на всё время записи в хранилище, поэтому конкурентные
/// `save`/`clear` не перемешиваются.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    current: Mutex<Option<SessionRecord>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Пустое хранилище сессии поверх `storage`. Для чтения сохранённой
    /// записи вызовите [`SessionStore::load`].
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            current: Mutex::new(None),
        }
    }

    /// Текущая запись сессии.
    pub async fn current(&self) -> Option<SessionRecord> {
        self.current.lock().await.clone()
    }

    /// Есть ли локальная сессия.
    pub async fn is_authenticated(&self) -> bool {
        self.current.lock().await.is_some()
    }

    /// Сохраняет запись в хранилище и делает её текущей.
    ///
    /// При ошибке хранилища текущая запись не меняется.
    pub async fn save(&self, record: SessionRecord) -> Result<(), StorageError> {
        let mut current = self.current.lock().await;
        let raw = serde_json::to_string(&record)?;
        self.storage.set(SESSION_KEY, &raw).await?;
        *current = Some(record);
        debug!("session saved");
        Ok(())
    }

    /// Удаляет копию записи в хранилище, затем текущую запись.
    ///
    /// При ошибке хранилища текущая запись остаётся.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut current = self.current.lock().await;
        self.storage.remove(SESSION_KEY).await?;
        *current = None;
        debug!("session cleared");
        Ok(())
    }

    /// Читает сохранённую запись (вызывается один раз при старте).
    ///
    /// Повреждённая запись удаляется, ошибки не пробрасываются: состояние
    /// просто остаётся пустым.
    pub async fn load(&self) -> Option<SessionRecord> {
        let mut current = self.current.lock().await;

        let raw = match self.storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                *current = None;
                return None;
            }
            Err(err) => {
                warn!(error = %err, "failed to read stored session, starting logged out");
                *current = None;
                return None;
            }
        };

        match parse_record(&raw) {
            Some(record) => {
                *current = Some(record.clone());
                Some(record)
            }
            None => {
                warn!("stored session is corrupt, discarding it");
                if let Err(err) = self.storage.remove(SESSION_KEY).await {
                    warn!(error = %err, "failed to discard corrupt session");
                }
                *current = None;
                None
            }
        }
    }
}
