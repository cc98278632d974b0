use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::model::library::Library;
use crate::domain::repository::LibraryRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるLibraryRepository実装。
/// 蔵書全体を1つのJSON配列として保存する。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `library.json` → `library.json.tmp`。拡張子を置き換えると `*.tmp` 自身と衝突する。
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let library: Library = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), books = library.len(), "read library file");
        Ok(Some(library))
    }

    /// 一時ファイルに書いてからrenameで置き換える。
    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(library)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), books = library.len(), "wrote library file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::book::{now, NewBook};

    fn sample_library() -> Library {
        let mut library = Library::new();
        library.add(
            NewBook {
                title: "Cosmos".into(),
                author: "Carl Sagan".into(),
                publication_year: Some(1980),
                genre: "Science".into(),
                read_status: true,
            },
            now(),
        );
        library
    }

    #[test]
    fn roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("library.json");
        let repo = JsonLibraryRepository::new(&path);

        // 初回loadはNone
        assert!(repo.load().unwrap().is_none());

        let library = sample_library();
        repo.save(&library).unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded, library);
        assert!(!dir.path().join("nested").join("library.json.tmp").exists());
    }

    #[test]
    fn save_to_tmp_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.tmp");
        let repo = JsonLibraryRepository::new(&path);

        let library = sample_library();
        repo.save(&library).unwrap();

        assert_eq!(repo.load().unwrap().unwrap(), library);
        assert!(!dir.path().join("library.tmp.tmp").exists());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let repo = JsonLibraryRepository::new("/data/library.json");
        assert_eq!(repo.tmp_path(), PathBuf::from("/data/library.json.tmp"));
    }

    #[test]
    fn load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "{ not json").unwrap();

        let repo = JsonLibraryRepository::new(&path);
        assert!(matches!(repo.load(), Err(JsonStoreError::Json(_))));
    }

    #[test]
    fn loads_file_written_by_older_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(
            &path,
            r#"[{"title": "Cosmos", "author": "Carl Sagan", "publication_year": 1980,
                "genre": "Science", "read_status": false, "added_date": "2024-05-01 09:30:00"}]"#,
        )
        .unwrap();

        let loaded = JsonLibraryRepository::new(&path).load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.books()[0].author(), "Carl Sagan");
        assert!(!loaded.books()[0].is_read());
    }
}
