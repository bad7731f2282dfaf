use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

/// Append-only file store for uploaded and generated documents. Names are
/// generated with uuid v4, so concurrent writes never collide and nothing
/// is ever overwritten.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Opens the store, creating the root directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Persists uploaded bytes under a fresh generated name and returns it.
    pub async fn save_upload(&self, bytes: &[u8], extension: &str) -> std::io::Result<String> {
        let name = format!("{}{}", Uuid::new_v4(), extension);
        fs::write(self.root.join(&name), bytes).await?;
        Ok(name)
    }

    /// Persists a generated document. The `rewritten-` prefix marks it as a
    /// derived artifact, distinguishable from original uploads. The name is
    /// returned only after the write completed, so no partial file is ever
    /// referenceable.
    pub async fn save_generated(&self, bytes: &[u8]) -> std::io::Result<String> {
        let name = format!("rewritten-{}.docx", Uuid::new_v4());
        fs::write(self.root.join(&name), bytes).await?;
        Ok(name)
    }

    /// Reads a previously stored document back, or `None` for unknown or
    /// unsafe names.
    pub async fn load(&self, name: &str) -> std::io::Result<Option<Vec<u8>>> {
        if !Self::is_safe_name(name) {
            return Ok(None);
        }
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Number of files currently in the store.
    pub async fn len(&self) -> std::io::Result<usize> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut count = 0;
        while entries.next_entry().await?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    // Generated names never contain separators; anything that does is an
    // attempted path traversal.
    fn is_safe_name(name: &str) -> bool {
        !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains("..")
    }
}
