use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Asynchronous file-system boundary of the discovery engine.
///
/// Both operations are single-shot: failures are not retried here, the search
/// simply moves on to the next candidate. Implementations other than
/// [`LocalFs`] exist mainly so tests (and editors embedding the engine) can
/// serve virtual file trees.
#[async_trait]
pub trait FileSystem: Send + Sync {
  async fn get_contents(&self, path: &Path) -> io::Result<String>;

  /// Lists the entry names (not full paths) of a directory.
  async fn list_files(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// [`FileSystem`] over the real local disk via `tokio::fs`.
pub struct LocalFs;

#[async_trait]
impl FileSystem for LocalFs {
  async fn get_contents(&self, path: &Path) -> io::Result<String> {
    tokio::fs::read_to_string(path).await
  }

  async fn list_files(&self, dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      names.push(entry.file_name().to_string_lossy().into_owned());
    }
    // Readdir order is platform dependent; keep candidate order stable.
    names.sort();
    Ok(names)
  }
}
