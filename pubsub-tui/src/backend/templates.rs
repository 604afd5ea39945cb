//! Message templates on disk

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// A `*.json` file offered by the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Lists `*.json` files (case-insensitive) directly inside `dir`, sorted by
/// name. Subdirectories and unreadable entries are skipped.
pub async fn list_json_files(dir: &Path) -> io::Result<Vec<TemplateFile>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.to_ascii_lowercase().ends_with(".json") {
            continue;
        }
        files.push(TemplateFile {
            name,
            path: entry.path(),
            size: meta.len(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

pub async fn read_template(path: &Path) -> io::Result<String> {
    fs::read_to_string(path).await
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    #[tokio::test]
    async fn lists_only_json_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("A.JSON"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = list_json_files(dir.path()).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A.JSON", "b.json"]);
        assert_eq!(files[1].size, 2);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_err!(list_json_files(&dir.path().join("nope")).await);
    }

    #[tokio::test]
    async fn reads_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        std::fs::write(&path, r#"{"id":"${id}"}"#).unwrap();
        let content = assert_ok!(read_template(&path).await);
        assert_eq!(content, r#"{"id":"${id}"}"#);
    }
}
