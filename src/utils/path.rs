use std::path::{Path, PathBuf};

/// Upper-case extension of `path`, as the metadata tables key them.
pub fn extension_upper(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_uppercase())
}

/// Upper-case text after the last dot of the file name. Unlike
/// `extension_upper` this also catches dot-files such as `.DS_Store`.
pub fn name_suffix_upper(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, suffix) = name.rsplit_once('.')?;
    Some(suffix.to_uppercase())
}

/// First free variant of `path`: itself, then `name (1).ext`, `name (2).ext`...
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter = 1usize;
    loop {
        let file_name = match &ext {
            Some(ext) => format!("{} ({}).{}", stem, counter, ext),
            None => format!("{} ({})", stem, counter),
        };
        let candidate = path.with_file_name(file_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// `path` relative to `base` for log lines, or the full path when it lies elsewhere.
pub fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
