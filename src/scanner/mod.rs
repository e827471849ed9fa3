pub mod walk;

pub use walk::{is_skipped_extension, list_files, SKIP_EXTENSIONS};
