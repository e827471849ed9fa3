use glob::Pattern;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::error::Error;
use crate::utils::path::{extension_upper, name_suffix_upper};

/// Files that never carry media dates worth reconciling.
pub const SKIP_EXTENSIONS: [&str; 19] = [
    "DMG", "XSL", "XML", "TXT", "DOC", "DOCX", "PPT", "DB", "LNK", "GIF", "BUP", "IFO", "VOB",
    "MP3", "ODT", "RAR", "PDF", "RTF", "DS_STORE",
];

/// Case-insensitive check of the extension, and of the text after the last
/// dot for dot-files. Names without any dot are never skipped.
pub fn is_skipped_extension(path: &Path) -> bool {
    let skip = |ext: Option<String>| ext.is_some_and(|e| SKIP_EXTENSIONS.contains(&e.as_str()));
    skip(extension_upper(path)) || skip(name_suffix_upper(path))
}

fn compile_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

/// Folders whose subtrees are scanned. Without patterns that is the root
/// itself; with patterns, the root's direct sub-folders whose name matches.
pub fn folders_to_scan(root: &Path, folder_patterns: &[String]) -> Result<Vec<PathBuf>, Error> {
    if folder_patterns.is_empty() {
        return Ok(vec![root.to_path_buf()]);
    }
    let patterns = compile_patterns(folder_patterns);

    let mut folders = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if patterns.iter().any(|p| p.matches(&name)) {
            folders.push(entry.path());
        }
    }
    folders.sort();
    Ok(folders)
}

/// All regular files below the selected folders, in a stable order. Anything
/// under one of `excluded` is left out.
pub fn list_files(
    root: &Path,
    folder_patterns: &[String],
    excluded: &[PathBuf],
) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for folder in folders_to_scan(root, folder_patterns)? {
        debug!("Listing files in {}", folder.display());
        let walker = WalkDir::new(&folder)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !excluded.iter().any(|x| e.path().starts_with(x)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
                        error!("Access denied while listing {}: {}", folder.display(), err);
                        continue;
                    }
                    return Err(err.into());
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_skip_extensions_are_case_insensitive() {
        assert!(is_skipped_extension(Path::new("/a/report.pdf")));
        assert!(is_skipped_extension(Path::new("/a/report.PDF")));
        assert!(is_skipped_extension(Path::new("/a/.DS_Store")));
        assert!(!is_skipped_extension(Path::new("/a/clip.flac")));
        assert!(!is_skipped_extension(Path::new("/a/Makefile")));
        assert!(!is_skipped_extension(Path::new("/a/pdf")));
    }

    #[test]
    fn test_patterns_restrict_top_level_folders() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("1. Photos/2019")).unwrap();
        fs::create_dir_all(root.join("Other")).unwrap();
        fs::write(root.join("1. Photos/2019/a.jpg"), "a").unwrap();
        fs::write(root.join("Other/b.jpg"), "b").unwrap();
        fs::write(root.join("c.jpg"), "c").unwrap();

        let all = list_files(root, &[], &[]).unwrap();
        assert_eq!(all.len(), 3);

        let filtered = list_files(root, &["1.*".to_string()], &[]).unwrap();
        assert_eq!(filtered, vec![root.join("1. Photos/2019/a.jpg")]);
    }

    #[test]
    fn test_excluded_folders_are_not_listed() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("logs/Files to review")).unwrap();
        fs::write(root.join("logs/Files to review/a.jpg"), "a").unwrap();
        fs::write(root.join("b.jpg"), "b").unwrap();

        let files = list_files(root, &[], &[root.join("logs")]).unwrap();
        assert_eq!(files, vec![root.join("b.jpg")]);
    }
}
