//! JSON file backed order counts shared by every conversation.

use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use fs2::FileExt;

use crate::{
    domain::{
        catalog::CanonicalName,
        counts::{has_orders, OrderBook, ProductCounts},
    },
    infra::error::AppError,
    usecases::contracts::{CounterStore, CounterStoreError},
};

const STORE_LOAD_FALLBACK: &str = "ORDER_STORE_LOAD_FALLBACK";
const STORE_COMMIT_FAILED: &str = "ORDER_STORE_COMMIT_FAILED";

/// Whole-file store: every operation reloads, every mutation rewrites.
///
/// Mutations hold `write_guard` for in-process exclusion and an advisory
/// lock on a sibling `.lock` file so another process sharing the file
/// waits instead of overwriting.
#[derive(Debug)]
pub struct JsonCounterStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl JsonCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted book. Missing, unreadable or malformed files load as empty.
    pub fn load(&self) -> OrderBook {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "order store not created yet");
                return OrderBook::new();
            }
            Err(source) => {
                tracing::warn!(
                    code = STORE_LOAD_FALLBACK,
                    path = %self.path.display(),
                    error = %source,
                    "order store unreadable, continuing with empty counts"
                );
                return OrderBook::new();
            }
        };

        if raw.trim().is_empty() {
            return OrderBook::new();
        }

        match serde_json::from_str(&raw) {
            Ok(book) => book,
            Err(source) => {
                tracing::warn!(
                    code = STORE_LOAD_FALLBACK,
                    path = %self.path.display(),
                    error = %source,
                    "order store is malformed, continuing with empty counts"
                );
                OrderBook::new()
            }
        }
    }

    /// Replaces the persisted book by writing a temp file and renaming it over the target.
    pub fn save(&self, book: &OrderBook) -> Result<(), AppError> {
        self.ensure_parent_dir()?;

        let mut payload = serde_json::to_string_pretty(book).map_err(AppError::StoreSerialize)?;
        payload.push('\n');

        let tmp_path = self.temp_path();
        let write_tmp = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(payload.as_bytes())?;
            file.sync_all()
        };

        if let Err(source) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(AppError::StoreWrite {
                path: tmp_path,
                source,
            });
        }

        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            AppError::StoreWrite {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Runs one load-mutate-save unit of work under exclusion.
    ///
    /// `apply` returns its result and whether the book changed; unchanged
    /// books are not written back.
    fn mutate<T>(&self, apply: impl FnOnce(&mut OrderBook) -> (T, bool)) -> Result<T, AppError> {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _file_lock = StoreFileLock::acquire(&self.lock_path())?;

        let mut book = self.load();
        let (result, changed) = apply(&mut book);

        if changed {
            self.save(&book)?;
        }

        Ok(result)
    }

    fn ensure_parent_dir(&self) -> Result<(), AppError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|source| AppError::StorageDirCreate {
                    path: parent.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path("tmp")
    }

    fn lock_path(&self) -> PathBuf {
        self.sibling_path("lock")
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "order_counts.json".to_owned());

        self.path.with_file_name(format!(".{file_name}.{suffix}"))
    }
}

impl CounterStore for JsonCounterStore {
    fn increment(
        &self,
        conversation_id: &str,
        product: &CanonicalName,
    ) -> Result<u64, CounterStoreError> {
        self.mutate(|book| {
            let count = book
                .entry(conversation_id.to_owned())
                .or_default()
                .entry(product.as_str().to_owned())
                .or_insert(0);
            *count = count.saturating_add(1);
            (*count, true)
        })
        .map_err(|error| self.commit_failed(conversation_id, "increment", error))
    }

    fn snapshot_and_clear(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ProductCounts>, CounterStoreError> {
        self.mutate(|book| {
            if !book.get(conversation_id).is_some_and(has_orders) {
                return (None, false);
            }

            (book.remove(conversation_id), true)
        })
        .map_err(|error| self.commit_failed(conversation_id, "snapshot_and_clear", error))
    }

    fn stats_for(&self, conversation_id: &str) -> ProductCounts {
        self.load().remove(conversation_id).unwrap_or_default()
    }
}

impl JsonCounterStore {
    fn commit_failed(
        &self,
        conversation_id: &str,
        operation: &'static str,
        error: AppError,
    ) -> CounterStoreError {
        tracing::error!(
            code = STORE_COMMIT_FAILED,
            conversation_id,
            operation,
            path = %self.path.display(),
            error = %error,
            "order store mutation was not committed"
        );

        match error {
            AppError::StoreLock { .. } => CounterStoreError::LockUnavailable,
            _ => CounterStoreError::WriteFailed,
        }
    }
}

/// Exclusive advisory lock released when dropped.
struct StoreFileLock {
    file: File,
}

impl StoreFileLock {
    fn acquire(path: &Path) -> Result<Self, AppError> {
        let to_lock_error = |source: std::io::Error| AppError::StoreLock {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_lock_error)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(to_lock_error)?;
        file.lock_exclusive().map_err(to_lock_error)?;

        Ok(Self { file })
    }
}

impl Drop for StoreFileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
