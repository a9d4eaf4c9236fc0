//! Project folders and metadata.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use vignette_error::{AssetError, AssetErrorKind, VignetteResult};

use crate::write::write_atomic;

const SUBDIRS: [&str; 5] = [
    "scripts",
    "audio",
    "scenes",
    "images/characters",
    "images/backgrounds",
];

/// Per-run record written to `project_metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// The original free-text prompt
    pub prompt: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// The project's folder name under the output directory
    pub folder_name: String,
    /// Total blocks in the assembled timeline
    pub block_count: usize,
    /// Dialogue blocks in the timeline
    pub dialogue_count: usize,
    /// Distinct speaking characters
    pub character_count: usize,
    /// Lines that received real audio
    pub audio_file_count: usize,
}

/// One pipeline run's folder on disk.
#[derive(Debug, Clone)]
pub struct Project {
    /// Folder name under the output directory
    pub name: String,
    /// Absolute or caller-relative project root
    pub root: PathBuf,
}

impl Project {
    /// Create the project folder and its standard subdirectories.
    ///
    /// The folder name is a cleaned prompt prefix, a timestamp, and a
    /// short random suffix, so concurrent runs with the same prompt never
    /// collide.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    #[instrument(skip(prompt), fields(output_dir = %output_dir.display()))]
    pub fn create(output_dir: &Path, prompt: &str) -> VignetteResult<Self> {
        let name = folder_name(prompt);
        let root = output_dir.join(&name);

        for subdir in SUBDIRS {
            fs::create_dir_all(root.join(subdir)).map_err(|e| {
                AssetError::new(AssetErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    root.join(subdir).display(),
                    e
                )))
            })?;
        }

        info!(project = %name, "Created project folder");
        Ok(Self { name, root })
    }

    /// Write the project's metadata record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn write_metadata(&self, metadata: &ProjectMetadata) -> VignetteResult<()> {
        let json = serde_json::to_string_pretty(metadata)
            .map_err(|e| AssetError::new(AssetErrorKind::FileWrite(e.to_string())))?;

        write_atomic(&self.root.join("project_metadata.json"), json.as_bytes())
    }
}

static STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Valid strip regex"));
static COLLAPSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("Valid collapse regex"));

/// Derive a filesystem-safe folder name from a prompt.
fn folder_name(prompt: &str) -> String {
    let head: String = prompt.chars().take(50).collect();
    let cleaned = STRIP.replace_all(&head, "");
    let cleaned = COLLAPSE.replace_all(cleaned.trim(), "_");

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let unique: String = uuid::Uuid::new_v4().to_string().chars().take(8).collect();

    format!("{}_{}_{}", cleaned, timestamp, unique)
}

/// List every project under the output directory, newest first.
///
/// Folders without a readable metadata file are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the output directory exists but cannot be read. A
/// missing output directory yields an empty list.
pub fn list_projects(output_dir: &Path) -> VignetteResult<Vec<ProjectMetadata>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(output_dir)
        .map_err(|e| AssetError::new(AssetErrorKind::FileRead(e.to_string())))?;

    let mut projects = Vec::new();
    for entry in entries.flatten() {
        let metadata_path = entry.path().join("project_metadata.json");
        if !metadata_path.is_file() {
            continue;
        }

        let raw = match fs::read_to_string(&metadata_path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %metadata_path.display(), error = %e, "Skipping unreadable metadata");
                continue;
            }
        };

        match serde_json::from_str::<ProjectMetadata>(&raw) {
            Ok(metadata) => projects.push(metadata),
            Err(e) => {
                warn!(path = %metadata_path.display(), error = %e, "Skipping malformed metadata")
            }
        }
    }

    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn metadata(folder: &str, age_minutes: i64) -> ProjectMetadata {
        ProjectMetadata {
            prompt: "test".to_string(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            folder_name: folder.to_string(),
            block_count: 4,
            dialogue_count: 2,
            character_count: 1,
            audio_file_count: 0,
        }
    }

    #[test]
    fn folder_name_cleans_the_prompt() {
        let name = folder_name("A detective questions a suspect!?");
        assert!(name.starts_with("A_detective_questions_a_suspect"));
        assert!(!name.contains('!'));
        assert!(!name.contains(' '));
    }

    #[test]
    fn folder_names_are_unique_per_call() {
        assert_ne!(folder_name("same prompt"), folder_name("same prompt"));
    }

    #[test]
    fn create_lays_out_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::create(dir.path(), "a rainy rooftop").unwrap();

        for subdir in SUBDIRS {
            assert!(project.root.join(subdir).is_dir(), "missing {}", subdir);
        }
    }

    #[test]
    fn metadata_round_trips_through_listing() {
        let dir = tempfile::tempdir().unwrap();

        let old = Project::create(dir.path(), "older").unwrap();
        old.write_metadata(&metadata(&old.name, 10)).unwrap();

        let new = Project::create(dir.path(), "newer").unwrap();
        new.write_metadata(&metadata(&new.name, 0)).unwrap();

        let listed = list_projects(dir.path()).unwrap();
        assert_eq!(listed.len(), 2);
        // Newest first.
        assert_eq!(listed[0].folder_name, new.name);
    }

    #[test]
    fn missing_output_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let listed = list_projects(&dir.path().join("absent")).unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn folders_without_metadata_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        Project::create(dir.path(), "no metadata yet").unwrap();

        let listed = list_projects(dir.path()).unwrap();
        assert!(listed.is_empty());
    }
}
