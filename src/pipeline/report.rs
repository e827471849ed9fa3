use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::utils::path::relative_display;

/// Category of a report entry. Every log line of an entry starts with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    PropRenamed,
    Duplicated,
    DateDamaged,
    Date2Review,
    EdinRenamed,
    Edin2Metadt,
    Inconsistent,
    OutOfBounds,
    Failed,
}

impl Tag {
    pub const ALL: [Tag; 9] = [
        Tag::PropRenamed,
        Tag::Duplicated,
        Tag::DateDamaged,
        Tag::Date2Review,
        Tag::EdinRenamed,
        Tag::Edin2Metadt,
        Tag::Inconsistent,
        Tag::OutOfBounds,
        Tag::Failed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tag::PropRenamed => "[PropRenamed]",
            Tag::Duplicated => "[Duplicated]",
            Tag::DateDamaged => "[DateDamaged]",
            Tag::Date2Review => "[Date2Review]",
            Tag::EdinRenamed => "[EdinRenamed]",
            Tag::Edin2Metadt => "[Edin2Metadt]",
            Tag::Inconsistent => "[Inconsistent]",
            Tag::OutOfBounds => "[OutOfBounds]",
            Tag::Failed => "[Failed]",
        }
    }

    fn headline(&self) -> &'static str {
        match self {
            Tag::PropRenamed => "Files with proprietary date-in-name renamed",
            Tag::Duplicated => "Files not renamed because the renamed file already exists",
            Tag::DateDamaged => "Files with damaged metadata date found",
            Tag::Date2Review => "Files with dates-to-review renamed",
            Tag::EdinRenamed => "Files with edition date-in-name renamed",
            Tag::Edin2Metadt => "Files with metadata date field edited",
            Tag::Inconsistent => {
                "Files with inconsistent metadata date and KDIN detected (metadata dates listed)"
            }
            Tag::OutOfBounds => "Files with dates out of folder-bounds detected",
            Tag::Failed => "Files that could not be processed",
        }
    }

    /// Informational tags are logged at info level, the rest need a human.
    fn is_informational(&self) -> bool {
        matches!(self, Tag::PropRenamed | Tag::EdinRenamed | Tag::Edin2Metadt)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub tag: Tag,
    /// Current path of the file the entry is about.
    pub path: PathBuf,
    pub detail: Option<String>,
}

impl ReportEntry {
    /// Folder holding the file, which is what a reviewer opens.
    pub fn folder(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }
}

/// Ordered list of the paths a pass affected.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    entries: Vec<ReportEntry>,
}

impl PassReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Tag, path: impl Into<PathBuf>, detail: Option<String>) {
        self.entries.push(ReportEntry {
            tag,
            path: path.into(),
            detail,
        });
    }

    pub fn fail(&mut self, path: impl Into<PathBuf>, err: impl fmt::Display) {
        self.push(Tag::Failed, path, Some(err.to_string()));
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.entries.iter().filter(|e| e.tag == tag).count()
    }

    pub fn paths(&self, tag: Tag) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| e.path.clone())
            .collect()
    }

    /// Result block per tag, paths relative to `base`.
    pub fn log(&self, base: &Path) {
        for tag in Tag::ALL {
            let count = self.count(tag);
            if count == 0 {
                continue;
            }
            if tag == Tag::Failed {
                error!("{} = {}", tag.headline(), count);
            } else if tag.is_informational() {
                info!("{} = {}", tag.headline(), count);
            } else {
                warn!("{} = {}", tag.headline(), count);
            }

            for entry in self.entries.iter().filter(|e| e.tag == tag) {
                let line = match &entry.detail {
                    Some(detail) => format!(
                        "{} ({}): {}",
                        tag,
                        detail,
                        relative_display(&entry.path, base)
                    ),
                    None => format!("{}: {}", tag, relative_display(&entry.path, base)),
                };
                match tag {
                    Tag::Failed => error!("{}", line),
                    t if t.is_informational() => info!("{}", line),
                    _ => warn!("{}", line),
                }
            }
        }
    }
}

/// Reports of a whole run, one per pass after the scan.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files_scanned: usize,
    pub proprietary: PassReport,
    pub integrity: PassReport,
    pub edit_migration: PassReport,
    pub consistency: PassReport,
    pub bounds: PassReport,
    /// Review folder holding before/after copies, when one was created.
    pub review_folder: Option<PathBuf>,
}

impl RunReport {
    /// Items a human has to look at. Renames and duplicates of the proprietary
    /// pass are routine and do not count, its failures do.
    pub fn warning_count(&self) -> usize {
        self.proprietary.count(Tag::Failed)
            + self.integrity.len()
            + self.edit_migration.len()
            + self.consistency.len()
            + self.bounds.len()
    }

    pub fn warnings_found(&self) -> bool {
        self.warning_count() > 0
    }

    /// Distinct folders holding the items to review, sorted.
    pub fn folders_to_review(&self) -> Vec<PathBuf> {
        let proprietary_failures = self
            .proprietary
            .entries()
            .iter()
            .filter(|e| e.tag == Tag::Failed);
        let mut folders: Vec<PathBuf> = proprietary_failures
            .chain(self.integrity.entries())
            .chain(self.edit_migration.entries())
            .chain(self.consistency.entries())
            .chain(self.bounds.entries())
            .map(|e| e.folder().to_path_buf())
            .collect();
        folders.sort();
        folders.dedup();
        folders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_tag() {
        let mut report = PassReport::new();
        report.push(Tag::PropRenamed, "/r/a.jpg", None);
        report.push(Tag::Duplicated, "/r/b.jpg", Some("x.jpg".to_string()));
        report.push(Tag::PropRenamed, "/r/c.jpg", None);
        assert_eq!(report.len(), 3);
        assert_eq!(report.count(Tag::PropRenamed), 2);
        assert_eq!(report.paths(Tag::Duplicated), vec![PathBuf::from("/r/b.jpg")]);
        assert_eq!(report.entries()[1].folder(), Path::new("/r"));
    }

    #[test]
    fn test_proprietary_renames_are_not_warnings() {
        let mut run = RunReport::default();
        run.proprietary.push(Tag::PropRenamed, "/r/a.jpg", None);
        run.proprietary.push(Tag::Duplicated, "/r/b.jpg", None);
        assert!(!run.warnings_found());

        run.proprietary.fail("/r/c.jpg", "permission denied");
        assert_eq!(run.warning_count(), 1);
    }

    #[test]
    fn test_folders_to_review_are_distinct() {
        let mut run = RunReport::default();
        run.proprietary.push(Tag::PropRenamed, "/r/x/a.jpg", None);
        run.consistency.push(Tag::Inconsistent, "/r/b/a.jpg", None);
        run.consistency.push(Tag::Inconsistent, "/r/b/c.jpg", None);
        run.bounds.push(Tag::OutOfBounds, "/r/a/d.jpg", None);
        assert_eq!(
            run.folders_to_review(),
            vec![PathBuf::from("/r/a"), PathBuf::from("/r/b")]
        );
    }

    #[test]
    fn test_every_later_pass_counts() {
        let mut run = RunReport::default();
        run.integrity.push(Tag::Date2Review, "/r/a.jpg", None);
        run.edit_migration.push(Tag::EdinRenamed, "/r/b.jpg", None);
        run.consistency.push(Tag::Inconsistent, "/r/c.jpg", None);
        run.bounds.push(Tag::OutOfBounds, "/r/d.jpg", None);
        assert_eq!(run.warning_count(), 4);
        assert!(run.warnings_found());
    }
}
