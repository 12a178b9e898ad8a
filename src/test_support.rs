use std::{
    env,
    ffi::{OsStr, OsString},
    sync::{Mutex, MutexGuard, PoisonError},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that read or write process environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets an env var for the guard's lifetime and restores the previous value on drop.
/// Hold `env_lock()` while this guard is alive.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvVarGuard {
    pub fn set(key: &'static str, value: impl AsRef<OsStr>) -> Self {
        let previous = env::var_os(key);
        env::set_var(key, value);
        Self { key, previous }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => env::set_var(self.key, value),
            None => env::remove_var(self.key),
        }
    }
}
