use chrono::Utc;
use leptos::logging::{error, log, warn};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// URL prefix under which stored images are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const CLEANUP_ATTEMPTS: u32 = 3;
const CLEANUP_BACKOFF: Duration = Duration::from_millis(50);

/// An image received with a submission, fully buffered.
#[derive(Debug, Clone)]
pub struct IncomingImage {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Directory of uploaded images, addressed by public reference paths.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        UploadStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if needed. Called once at start-up.
    pub fn ensure_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        log!("[UPLOAD] Upload directory ready at {}", self.dir.display());
        Ok(())
    }

    /// Writes the image under a fresh timestamp-derived name and returns its reference.
    pub async fn save(&self, image: &IncomingImage) -> io::Result<String> {
        let stem = Utc::now().timestamp_millis().to_string();
        let extension = extension_of(&image.original_name);

        // Same-millisecond uploads get a numeric suffix instead of overwriting
        for attempt in 0u32..100 {
            let filename = match attempt {
                0 => format!("{stem}{extension}"),
                n => format!("{stem}-{n}{extension}"),
            };
            let path = self.dir.join(&filename);
            let file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };
            write_or_discard(&path, file, &image.bytes).await?;

            log!(
                "[UPLOAD] Stored {} ({} bytes) as {}",
                image.original_name,
                image.bytes.len(),
                filename
            );
            return Ok(format!("{PUBLIC_PREFIX}/{filename}"));
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free upload name for timestamp {stem}"),
        ))
    }

    /// Maps a reference back to the file it names inside the upload directory.
    ///
    /// Only `/uploads/<single file name>` resolves; anything that could
    /// escape the directory yields `None`.
    pub fn path_for(&self, reference: &str) -> Option<PathBuf> {
        let name = reference.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Some(self.dir.join(file)),
            _ => None,
        }
    }

    /// Removes the file behind a reference. A file that is already gone counts as removed.
    pub async fn remove(&self, reference: &str) -> io::Result<()> {
        let path = self.path_for(reference).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not an upload reference: {reference}"),
            )
        })?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                log!("[UPLOAD] Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Best-effort cleanup: retries a few times, logs the final failure, never errors.
    pub async fn remove_with_retry(&self, reference: &str) -> bool {
        for attempt in 1..=CLEANUP_ATTEMPTS {
            match self.remove(reference).await {
                Ok(()) => return true,
                Err(e) if e.kind() == io::ErrorKind::InvalidInput => {
                    warn!("[UPLOAD] Skipping cleanup: {}", e);
                    return false;
                }
                Err(e) if attempt < CLEANUP_ATTEMPTS => {
                    warn!(
                        "[UPLOAD] Removing {} failed (attempt {}): {}",
                        reference, attempt, e
                    );
                    tokio::time::sleep(CLEANUP_BACKOFF * attempt).await;
                }
                Err(e) => {
                    error!("[UPLOAD] Error deleting image file {}: {}", reference, e);
                }
            }
        }
        false
    }
}

// A partly written file is deleted so no truncated image is left behind
async fn write_or_discard<W>(path: &Path, mut writer: W, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written: io::Result<()> = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(writer);
        warn!("[UPLOAD] Writing {} failed: {}", path.display(), e);
        if let Err(remove_err) = fs::remove_file(path).await {
            error!(
                "[UPLOAD] Could not discard partial file {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e);
    }
    Ok(())
}

// ".png" for "photo.png"-style names; empty when absent or unsafe in a file name
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && !ext
                    .chars()
                    .any(|c| c == '/' || c == '\\' || c.is_control() || c.is_whitespace())
        })
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::tempdir;

    // Accepts nothing, like a full disk
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn image(name: &str) -> IncomingImage {
        IncomingImage {
            original_name: name.into(),
            bytes: b"\x89PNG fake image".to_vec(),
        }
    }

    #[test]
    fn test_extension_is_preserved() {
        assert_eq!(extension_of("car.png"), ".png");
        assert_eq!(extension_of("archive.tar.GZ"), ".GZ");
        assert_eq!(extension_of("no_extension"), "");
        assert_eq!(extension_of("photo.jpég"), ".jpég");
        assert_eq!(extension_of("weird.p/ng"), "");
        assert_eq!(extension_of("weird.p\\ng"), "");
        assert_eq!(extension_of("odd.p ng"), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_path_for_rejects_escapes() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.path_for("/uploads/1700000000000.png"),
            Some(PathBuf::from("/srv/uploads/1700000000000.png"))
        );
        assert_eq!(store.path_for("/uploads/../etc/passwd"), None);
        assert_eq!(store.path_for("/uploads/a/b.png"), None);
        assert_eq!(store.path_for("/uploads/"), None);
        assert_eq!(store.path_for("/elsewhere/a.png"), None);
        assert_eq!(store.path_for("/uploadsX/a.png"), None);
    }

    #[tokio::test]
    async fn test_save_writes_file_under_reference() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        store.ensure_dir().unwrap();

        let reference = store.save(&image("truck.jpg")).await.unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with(".jpg"));

        let path = store.path_for(&reference).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"\x89PNG fake image");
    }

    #[tokio::test]
    async fn test_rapid_saves_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let mut references = Vec::new();
        for _ in 0..5 {
            references.push(store.save(&image("bike.png")).await.unwrap());
        }
        references.sort();
        references.dedup();
        assert_eq!(references.len(), 5);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 5);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let reference = store.save(&image("van.png")).await.unwrap();

        store.remove(&reference).await.unwrap();
        assert!(!store.path_for(&reference).unwrap().exists());
        store.remove(&reference).await.unwrap();
        assert!(store.remove_with_retry(&reference).await);
    }

    #[tokio::test]
    async fn test_remove_with_retry_reports_failure() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        // A directory where the file should be cannot be unlinked
        std::fs::create_dir(dir.path().join("stuck.png")).unwrap();

        assert!(!store.remove_with_retry("/uploads/stuck.png").await);
        assert!(!store.remove_with_retry("/uploads/../stuck.png").await);
        assert!(dir.path().join("stuck.png").exists());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1700000000000.png");
        std::fs::write(&path, b"\x89PN").unwrap();

        let err = write_or_discard(&path, FullDisk, b"\x89PNG fake image")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_non_ascii_extension_is_kept_on_save() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let reference = store.save(&image("photo.jpég")).await.unwrap();
        assert!(reference.ends_with(".jpég"));
        assert!(store.path_for(&reference).unwrap().is_file());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("nested").join("uploads"));
        store.ensure_dir().unwrap();
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
    }
}
