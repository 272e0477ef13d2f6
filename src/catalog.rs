//! Track catalog
//!
//! Lists the track definitions in a directory for a level-select screen.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RushError;
use crate::track::TrackDefinition;

const DIFFICULTY_NAMES: [&str; 9] = [
    "Easy",
    "Medium",
    "Hard",
    "Harder",
    "Very Hard",
    "Extremely Hard",
    "Borderline Impossible",
    "Impossible",
    "Definitely Impossible",
];

/// Display name of a difficulty level.
pub fn difficulty_name(index: usize) -> String {
    DIFFICULTY_NAMES
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Level {}", index + 1))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub definition: TrackDefinition,
}

impl CatalogEntry {
    /// "artist - name"
    pub fn title(&self) -> String {
        format!("{} - {}", self.definition.artist, self.definition.name)
    }

    pub fn difficulties(&self) -> Vec<String> {
        (0..self.definition.levels.len()).map(difficulty_name).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Read every `.json`, `.yaml` and `.yml` definition directly inside `dir`,
    /// ordered by file name. Files that fail to load are skipped.
    pub fn scan(dir: impl AsRef<Path>) -> Result<Catalog, RushError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RushError::load(dir, "not a directory"));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map_or(false, |ext| matches!(ext, "json" | "yaml" | "yml"))
            })
        {
            let path = entry.into_path();
            match TrackDefinition::load(&path) {
                Ok(definition) => entries.push(CatalogEntry { path, definition }),
                Err(e) => log::warn!("skipping {}: {}", path.display(), e),
            }
        }

        log::info!("found {} tracks in {}", entries.len(), dir.display());
        Ok(Catalog { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_difficulty_names() {
        assert_eq!(difficulty_name(0), "Easy");
        assert_eq!(difficulty_name(8), "Definitely Impossible");
        assert_eq!(difficulty_name(9), "Level 10");
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"name": "Korobeiniki", "artist": "Traditional", "midi": "t.mid", "levels": [[0], [0, 1]]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("a.yaml"), "name: Intro\nmidi: i.mid\nlevels: [[0]]\n").unwrap();
        fs::write(dir.path().join("c.json"), "{ broken").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a track").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested").join("d.json"),
            r#"{"midi": "d.mid", "levels": [[0]]}"#,
        )
        .unwrap();

        let catalog = Catalog::scan(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].title(), "Unknown - Intro");
        assert_eq!(catalog.entries()[1].title(), "Traditional - Korobeiniki");
        assert_eq!(catalog.entries()[1].difficulties(), vec!["Easy", "Medium"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Catalog::scan(dir.path().join("missing")).is_err());
    }
}
