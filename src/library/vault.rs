use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A transient upload as handed over by the upload-receiving layer.
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub path: PathBuf,

    pub original_name: String,
}

/// Durable reference to a retained copy of an uploaded document.
#[derive(Debug, Clone)]
pub struct RetainedFile {
    pub path: PathBuf,

    pub original_name: String,

    pub size: Option<i64>,
}

/// Durable home for uploaded financial documents. Retained copies outlive the
/// transient upload and back the persisted record for audit and re-processing.
#[derive(Clone)]
pub struct UploadVault {
    path: PathBuf,
}

impl UploadVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.path).await?;
        Ok(())
    }

    /// Copies the transient upload into the vault and returns the durable
    /// reference. The original is left in place; the caller decides when to
    /// discard it.
    pub async fn retain(&self, upload: &ReceivedUpload) -> Result<RetainedFile> {
        self.ensure_exists().await?;

        let basename = Path::new(&upload.original_name).file_name().map_or_else(
            || "document".to_string(),
            |name| name.to_string_lossy().into_owned(),
        );

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let retained_name = format!("{}_{}_{}", timestamp, Uuid::new_v4(), basename);
        let retained_path = self.path.join(&retained_name);

        fs::copy(&upload.path, &retained_path).await?;

        let size = fs::metadata(&retained_path)
            .await
            .ok()
            .map(|m| i64::try_from(m.len()).unwrap_or(i64::MAX));

        info!("Retained {:?} -> {:?}", upload.path, retained_path);

        Ok(RetainedFile {
            path: retained_path,
            original_name: basename,
            size,
        })
    }
}

/// Removes a file, tolerating one that is already gone. Failures are logged
/// and swallowed so cleanup can never mask the error that triggered it.
pub async fn discard(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Discarded {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Discard of {:?} skipped, already gone", path);
        }
        Err(e) => warn!("Failed to discard {:?}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skorr-vault-{label}-{}", Uuid::new_v4()))
    }

    async fn write_upload(dir: &Path, contents: &[u8]) -> ReceivedUpload {
        fs::create_dir_all(dir).await.unwrap();
        let path = dir.join(format!("{}_profile.json", Uuid::new_v4()));
        fs::write(&path, contents).await.unwrap();
        ReceivedUpload {
            path,
            original_name: "profile.json".to_string(),
        }
    }

    #[tokio::test]
    async fn retain_copies_and_keeps_the_original() {
        let uploads = scratch_dir("uploads");
        let vault = UploadVault::new(scratch_dir("retained"));

        let upload = write_upload(&uploads, b"{\"MonthlyIncome\":1}").await;
        let retained = vault.retain(&upload).await.unwrap();

        assert!(upload.path.exists());
        assert!(retained.path.exists());
        assert_ne!(upload.path, retained.path);
        assert_eq!(retained.original_name, "profile.json");
        assert_eq!(
            fs::read(&retained.path).await.unwrap(),
            b"{\"MonthlyIncome\":1}"
        );
    }

    #[tokio::test]
    async fn retained_names_do_not_collide() {
        let uploads = scratch_dir("uploads");
        let vault = UploadVault::new(scratch_dir("retained"));

        let upload = write_upload(&uploads, b"{}").await;
        let first = vault.retain(&upload).await.unwrap();
        let second = vault.retain(&upload).await.unwrap();

        assert_ne!(first.path, second.path);
    }

    #[tokio::test]
    async fn discard_removes_the_file() {
        let uploads = scratch_dir("uploads");
        let upload = write_upload(&uploads, b"{}").await;

        discard(&upload.path).await;
        assert!(!upload.path.exists());
    }

    #[tokio::test]
    async fn discard_of_a_missing_file_is_a_noop() {
        let ghost = scratch_dir("ghost").join("never-written.json");

        discard(&ghost).await;
        discard(&ghost).await;
    }
}
