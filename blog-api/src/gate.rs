use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::repository::AuthRepository;
use crate::session::SessionStore;
use crate::transport::Transport;

/// Уведомление, когда сервер подтвердил, что сессии нет.
pub const LOGIN_REQUIRED_NOTICE: &str = "login required";
/// Уведомление, когда проверка сессии завершилась ошибкой.
pub const SESSION_EXPIRED_NOTICE: &str = "session expired, please log in again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Состояние проверки доступа к защищённым разделам.
pub enum GateState {
    /// Проверка ещё идёт (или не запускалась).
    Checking,
    /// Сервер подтвердил сессию.
    Authenticated,
    /// Сессии нет; пользователь отправлен на вход.
    Unauthenticated,
}

/// Интерфейс пользователя, которым управляет `AuthGate`.
pub trait GateUi: Send + Sync {
    /// Показывает предупреждение.
    fn warn(&self, message: &str);
    /// Переводит пользователя на другой экран.
    fn redirect(&self, path: &str);
}

/// Решает, можно ли открыть защищённый раздел, по живой проверке на сервере.
pub struct AuthGate<T> {
    auth: AuthRepository<T>,
    session: Arc<SessionStore>,
    ui: Arc<dyn GateUi>,
    login_path: String,
    state: Mutex<GateState>,
}

impl<T: Transport> AuthGate<T> {
    /// Создаёт гейт в состоянии `Checking`.
    pub fn new(
        auth: AuthRepository<T>,
        session: Arc<SessionStore>,
        ui: Arc<dyn GateUi>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            session,
            ui,
            login_path: login_path.into(),
            state: Mutex::new(GateState::Checking),
        }
    }

    /// Текущее состояние.
    pub fn state(&self) -> GateState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Проверяет сессию на сервере.
    ///
    /// Возвращает `true`, если доступ разрешён. Иначе сессия сброшена,
    /// пользователь предупреждён и отправлен на страницу входа.
    pub async fn verify(&self) -> bool {
        let check = CheckGuard::enter(&self.state);

        let notice = match self.auth.check_authentication().await {
            Ok(true) => {
                debug!("session confirmed by server");
                check.finish(GateState::Authenticated);
                return true;
            }
            Ok(false) => LOGIN_REQUIRED_NOTICE,
            Err(err) => {
                warn!(status = err.status_code(), error = %err, "session check failed");
                SESSION_EXPIRED_NOTICE
            }
        };

        check.finish(GateState::Unauthenticated);
        if let Err(err) = self.session.clear().await {
            warn!(error = %err, "failed to clear local session");
        }
        self.ui.warn(notice);
        self.ui.redirect(&self.login_path);
        false
    }
}

// Выставляет `Unauthenticated`, если проверку прервали (future отброшен).
struct CheckGuard<'a> {
    state: &'a Mutex<GateState>,
    finished: bool,
}

impl<'a> CheckGuard<'a> {
    fn enter(state: &'a Mutex<GateState>) -> Self {
        *state.lock().unwrap_or_else(PoisonError::into_inner) = GateState::Checking;
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, outcome: GateState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
        self.finished = true;
    }
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state.lock().unwrap_or_else(PoisonError::into_inner) = GateState::Unauthenticated;
        }
    }
}
