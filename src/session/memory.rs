//! In-process session store

use std::sync::{RwLock, RwLockWriteGuard};

use super::{Session, SessionStore};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Option<String>>> {
        self.token
            .write()
            .map_err(|_| AppError::Internal("Session lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.token
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .map(Session::new)
    }

    fn set(&self, token: &str) -> AppResult<()> {
        *self.write()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.write()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_and_clear_is_idempotent() {
        let store = MemorySessionStore::with_token("first");
        store.set("second").unwrap();
        assert_eq!(store.get().unwrap().token(), "second");

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_poisoned_lock_reports_error() {
        let store = std::sync::Arc::new(MemorySessionStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.token.write().unwrap();
            panic!("poison the session lock");
        })
        .join();

        assert!(matches!(store.set("abc"), Err(AppError::Internal(_))));
        assert!(matches!(store.clear(), Err(AppError::Internal(_))));
    }
}
