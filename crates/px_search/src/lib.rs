pub mod arxiv;

pub use arxiv::{ArxivClient, ArxivConfig};

pub mod prelude {
    pub use super::arxiv::{ArxivClient, ArxivConfig};
    pub use px_core::{Article, PaperSource, Result, Error};
}
