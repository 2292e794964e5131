pub mod archive;
pub mod filename;
mod utils;

pub use archive::{ArchiveConfig, ArchiveWriter, FileNaming, DEFAULT_ARCHIVE_DIR};
pub use filename::normalize;

pub mod prelude {
    pub use super::archive::{ArchiveConfig, ArchiveWriter, FileNaming};
    pub use super::filename::normalize;
    pub use px_core::{Article, SaveReport, Result, Error};
}
