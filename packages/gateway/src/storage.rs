use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::utils::filename::extension;

/// Write-once store for uploaded archives.
///
/// Files are kept flat under a single directory and named
/// `mod_<stamp>.<ext>` where `<stamp>` is a millisecond timestamp. The stamp
/// is forced strictly increasing within the process, so two uploads landing
/// in the same millisecond still get distinct names and nothing is ever
/// overwritten.
pub struct FileStore {
    root: PathBuf,
    last_stamp: AtomicI64,
}

impl FileStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            last_stamp: AtomicI64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self.last_stamp.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Generate the unique name an upload will be stored under, keeping the
    /// original file's extension.
    pub fn assign_name(&self, original: &str) -> String {
        let stamp = self.next_stamp();
        match extension(original) {
            Some(ext) => format!("mod_{stamp}.{ext}"),
            None => format!("mod_{stamp}"),
        }
    }

    /// Move a fully-received temp file into the store under `assigned`.
    ///
    /// An existing target is a hard failure; assigned names are unique so
    /// this only fires on operator error (e.g. two gateways sharing a dir).
    pub async fn persist(&self, temp: &Path, assigned: &str) -> io::Result<PathBuf> {
        let target = self.root.join(assigned);

        if tokio::fs::try_exists(&target).await? {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("refusing to overwrite {}", target.display()),
            ));
        }

        // Rename when temp and store share a filesystem, copy otherwise.
        if tokio::fs::rename(temp, &target).await.is_err() {
            tokio::fs::copy(temp, &target).await?;
            let _ = tokio::fs::remove_file(temp).await;
        }

        Ok(target)
    }
}
