use std::sync::Arc;
use px_archive::ArchiveWriter;
use px_core::PaperSource;
use px_inference::ProfileReranker;

pub struct AppState {
    pub source: Arc<dyn PaperSource>,
    pub reranker: ProfileReranker,
    pub archive: ArchiveWriter,
}
