//! Content scanner.
//!
//! Walks the content root with `walkdir` and lazily yields every regular
//! file whose extension is a configured document extension. Entries are
//! visited in file-name order, so two scans of an unchanged tree produce the
//! same sequence.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ContentConfig;
use crate::error::{IndexerError, Result};

/// A document file found beneath the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// Path relative to the content root with `/` separators.
    pub relative_path: String,
}

/// Start a scan of `config.root`.
///
/// The root is checked eagerly: a missing or unreadable root is reported
/// here, before any item is produced. Errors met while walking (unreadable
/// subdirectories, broken links) are yielded as `Err` items.
pub fn scan_documents(
    config: &ContentConfig,
) -> Result<impl Iterator<Item = Result<DiscoveredFile>>> {
    let root = config.root.clone();

    let metadata =
        std::fs::metadata(&root).map_err(|e| IndexerError::filesystem(&root, e))?;
    if !metadata.is_dir() {
        return Err(IndexerError::filesystem(
            &root,
            std::io::Error::other("content root is not a directory"),
        ));
    }
    std::fs::read_dir(&root).map_err(|e| IndexerError::filesystem(&root, e))?;

    let mut excludes = vec!["**/node_modules/**".to_string(), "**/.git/**".to_string()];
    excludes.extend(config.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&excludes)?;

    let extensions: Vec<String> = config
        .extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_string())
        .collect();

    let walker = WalkDir::new(&root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name();

    Ok(walker.into_iter().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return Some(Err(IndexerError::Walk(e))),
        };
        // Symlinked files are indexed like regular ones; `follow_symlinks`
        // only governs descending into linked directories.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            return None;
        }

        let path = entry.path();
        if !has_document_extension(path, &extensions) {
            return None;
        }

        let relative_path = relative_slash_path(&root, path);
        if exclude_set.is_match(&relative_path) {
            return None;
        }

        Some(Ok(DiscoveredFile {
            path: path.to_path_buf(),
            relative_path,
        }))
    }))
}

/// Collect a full scan, stopping at the first error.
pub fn collect_documents(config: &ContentConfig) -> Result<Vec<DiscoveredFile>> {
    scan_documents(config)?.collect()
}

fn has_document_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|want| want == ext))
        .unwrap_or(false)
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            IndexerError::configuration(format!("invalid exclude glob '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| IndexerError::configuration(format!("invalid exclude globs: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn content_config(root: &Path) -> ContentConfig {
        ContentConfig {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn finds_documents_at_every_depth() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "intro.md", "# Intro");
        write(tmp.path(), "guide/index.md", "# Guide");
        write(tmp.path(), "guide/deep/nested/page.mdx", "# Deep");
        write(tmp.path(), "guide/notes.txt", "not a doc");
        write(tmp.path(), "img/logo.png", "binary");

        let files = collect_documents(&content_config(tmp.path())).unwrap();
        let rel: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            rel,
            vec!["guide/deep/nested/page.mdx", "guide/index.md", "intro.md"]
        );
    }

    #[test]
    fn each_file_is_visited_once() {
        let tmp = TempDir::new().unwrap();
        for i in 0..10 {
            write(tmp.path(), &format!("a/b/doc{}.md", i), "x");
        }
        let files = collect_documents(&content_config(tmp.path())).unwrap();
        let mut rel: Vec<String> = files.into_iter().map(|f| f.relative_path).collect();
        let total = rel.len();
        rel.dedup();
        assert_eq!(total, 10);
        assert_eq!(rel.len(), 10);
    }

    #[test]
    fn honours_exclude_globs_and_default_excludes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "keep.md", "x");
        write(tmp.path(), "drafts/skip.md", "x");
        write(tmp.path(), "node_modules/pkg/readme.md", "x");

        let mut config = content_config(tmp.path());
        config.exclude_globs = vec!["drafts/**".to_string()];
        let files = collect_documents(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "keep.md");
    }

    #[test]
    fn custom_extensions() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "x");
        write(tmp.path(), "b.markdown", "x");

        let mut config = content_config(tmp.path());
        config.extensions = vec![".markdown".to_string()];
        let files = collect_documents(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "b.markdown");
    }

    #[test]
    fn missing_root_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let config = content_config(&tmp.path().join("does-not-exist"));
        assert!(matches!(
            scan_documents(&config),
            Err(IndexerError::Filesystem { .. })
        ));
    }

    #[test]
    fn file_root_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "single.md", "x");
        let config = content_config(&tmp.path().join("single.md"));
        assert!(matches!(
            scan_documents(&config),
            Err(IndexerError::Filesystem { .. })
        ));
    }

    #[test]
    fn invalid_exclude_glob_is_a_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = content_config(tmp.path());
        config.exclude_globs = vec!["a/[".to_string()];
        assert!(matches!(
            scan_documents(&config),
            Err(IndexerError::Configuration(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_indexed_without_following_directories() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write(outside.path(), "shared.md", "x");
        write(outside.path(), "linked-dir/inner.md", "x");
        write(tmp.path(), "own.md", "x");
        std::os::unix::fs::symlink(outside.path().join("shared.md"), tmp.path().join("shared.md"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("linked-dir"), tmp.path().join("linked-dir"))
            .unwrap();

        let files = collect_documents(&content_config(tmp.path())).unwrap();
        let rel: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(rel, vec!["own.md", "shared.md"]);
    }
}
