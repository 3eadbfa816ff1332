//! Binary asset storage (posters, photos).
//!
//! Entities only hold the reference string returned by [`AssetStore::store`];
//! the bytes live wherever the store implementation puts them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::CoreError;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Lowercased extension from the client file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Narrow contract of the asset storage collaborator.
///
/// `container` groups assets by owning resource (e.g. `"movies"`).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist `bytes` and return a reference to store on the entity.
    async fn store(
        &self,
        bytes: &[u8],
        extension: &str,
        container: &str,
        content_type: &str,
    ) -> Result<String, CoreError>;

    /// Remove a previously stored asset. Unknown references are ignored.
    async fn remove(&self, reference: &str, container: &str) -> Result<(), CoreError>;
}

/// Stores assets on the local filesystem under `root/<container>/`.
///
/// References are public URLs of the form
/// `<public_base_url>/assets/<container>/<file>`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference back to its file, refusing anything outside `container`.
    fn path_for(&self, reference: &str, container: &str) -> Option<PathBuf> {
        let file_name = reference.rsplit('/').next()?;
        let valid = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains('\\');
        valid.then(|| self.root.join(container).join(file_name))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(
        &self,
        bytes: &[u8],
        extension: &str,
        container: &str,
        _content_type: &str,
    ) -> Result<String, CoreError> {
        let dir = self.root.join(container);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Storage(format!("failed to create {}: {e}", dir.display())))?;

        let file_name = format!("{}.{extension}", uuid::Uuid::new_v4());
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Storage(format!("failed to write {}: {e}", path.display())))?;

        Ok(format!(
            "{}/assets/{container}/{file_name}",
            self.public_base_url
        ))
    }

    async fn remove(&self, reference: &str, container: &str) -> Result<(), CoreError> {
        let Some(path) = self.path_for(reference, container) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(format!(
                "failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}
