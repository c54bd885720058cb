//! Delivery of finished artifacts

use crate::artifact::RenderedArtifact;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives every artifact a batch produces, in order.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Hand over one artifact under `suggested_name`.
    async fn deliver(&self, artifact: &RenderedArtifact, suggested_name: &str) -> Result<()>;
}

/// Writes each artifact as `<directory>/<suggested_name>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `directory`, created on first delivery.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, artifact: &RenderedArtifact, suggested_name: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create directory {}: {e}",
                    self.directory.display()
                ),
            ))
        })?;

        let path = self.directory.join(suggested_name);
        tokio::fs::write(&path, &artifact.png).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {e}", path.display()),
            ))
        })?;

        tracing::info!(path = %path.display(), bytes = artifact.png.len(), "Saved QR code");
        Ok(())
    }
}

/// Keeps delivered artifacts in memory, paired with their names.
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<(String, RenderedArtifact)>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything delivered so far.
    pub fn take(&self) -> Vec<(String, RenderedArtifact)> {
        let mut delivered = self.delivered.lock().expect("memory sink mutex poisoned");
        std::mem::take(&mut *delivered)
    }

    /// Names delivered so far, in order.
    pub fn names(&self) -> Vec<String> {
        let delivered = self.delivered.lock().expect("memory sink mutex poisoned");
        delivered.iter().map(|(name, _)| name.clone()).collect()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, artifact: &RenderedArtifact, suggested_name: &str) -> Result<()> {
        let mut delivered = self.delivered.lock().expect("memory sink mutex poisoned");
        delivered.push((suggested_name.to_string(), artifact.clone()));
        Ok(())
    }
}
