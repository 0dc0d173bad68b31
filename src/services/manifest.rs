use crate::error::Result;
use crate::types::SplitOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Sidecar file, kept in the scanned directory, listing the halves written
/// by earlier runs.
pub const MANIFEST_FILE: &str = ".paper-tools-split.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitManifest {
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source: String,
    pub outputs: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub created_at: String,
}

impl SplitManifest {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    /// Reads the manifest in `dir`. A missing or unreadable manifest yields an
    /// empty one.
    pub async fn load(dir: &Path) -> Self {
        let path = Self::path_in(dir);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No manifest at {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Ignoring unreadable manifest {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub async fn save(&self, dir: &Path) -> Result<()> {
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(Self::path_in(dir), json_content).await?;
        Ok(())
    }

    /// Adds or replaces the entry for the outcome's source file.
    pub fn record(&mut self, outcome: &SplitOutcome) {
        let source = file_name(&outcome.source);
        self.entries.retain(|e| e.source != source);
        self.entries.push(ManifestEntry {
            source,
            outputs: vec![file_name(&outcome.left), file_name(&outcome.right)],
            width: outcome.width,
            height: outcome.height,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn is_output(&self, path: &Path) -> bool {
        let name = file_name(path);
        self.entries
            .iter()
            .any(|e| e.outputs.iter().any(|o| *o == name))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
