use chrono::{Local, NaiveDate};
use px_core::{Article, Error, PaperSource, Result, SaveFailure, SaveReport};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::filename;
use crate::utils;

pub const DEFAULT_ARCHIVE_DIR: &str = "saved_articles";

/// How archived documents are named inside a day folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileNaming {
    /// `<id>.pdf`
    #[default]
    Id,
    /// `<normalized title>.pdf`
    Title,
}

impl FromStr for FileNaming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            other => Err(format!("Invalid file naming '{}', expected 'id' or 'title'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub root: PathBuf,
    pub naming: FileNaming,
}

impl ArchiveConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            naming: FileNaming::default(),
        }
    }

    pub fn with_naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_DIR)
    }
}

/// Downloads selected articles into `<root>/<YYYYMMDD>/`.
pub struct ArchiveWriter {
    config: ArchiveConfig,
    source: Arc<dyn PaperSource>,
}

impl ArchiveWriter {
    pub fn new(config: ArchiveConfig, source: Arc<dyn PaperSource>) -> Self {
        Self { config, source }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn folder_name(date: NaiveDate) -> String {
        date.format("%Y%m%d").to_string()
    }

    /// Archive `articles` into today's folder.
    pub async fn save(&self, articles: &[Article]) -> Result<SaveReport> {
        self.save_on(Local::now().date_naive(), articles).await
    }

    /// Archive `articles` into the folder for `date`.
    ///
    /// Only a failure to create the folder fails the call; per-article
    /// failures are collected into the report and the batch continues.
    pub async fn save_on(&self, date: NaiveDate, articles: &[Article]) -> Result<SaveReport> {
        let folder_name = Self::folder_name(date);
        let folder = self.config.root.join(&folder_name);
        tokio::fs::create_dir_all(&folder).await?;

        let mut report = SaveReport::default();

        for article in articles {
            match self.save_article(&folder, article).await {
                Ok(file_name) => {
                    info!("💾 Saved {} to {}", article.title, folder.join(&file_name).display());
                    report.saved_files.push(file_name);
                }
                Err(e) => {
                    warn!("⚠️ Failed to archive {}: {}", article.title, e);
                    report.failures.push(SaveFailure {
                        title: article.title.clone(),
                        link: article.link.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report.message = summary_message(&folder_name, report.saved_files.len(), report.failures.len());
        info!(
            "💾 Archived {}/{} articles into {}",
            report.saved_files.len(),
            articles.len(),
            folder.display()
        );
        Ok(report)
    }

    async fn save_article(&self, folder: &Path, article: &Article) -> Result<String> {
        let id = article
            .source_id()
            .ok_or_else(|| Error::Archive(format!("Cannot derive an id from link '{}'", article.link)))?;
        let bytes = self.source.fetch_document(id).await?;

        let file_name = self.file_name(id, article);
        let path = folder.join(&file_name);
        tokio::task::spawn_blocking(move || utils::write_atomic_bytes(&path, &bytes))
            .await
            .map_err(|e| Error::Archive(format!("Write task failed: {}", e)))??;
        Ok(file_name)
    }

    fn file_name(&self, id: &str, article: &Article) -> String {
        let stem = match self.config.naming {
            FileNaming::Title => filename::normalize(&article.title),
            FileNaming::Id => String::new(),
        };
        if stem.is_empty() {
            // old-style ids such as hep-th/9901001 must stay inside the day folder
            format!("{}.pdf", id.replace('/', "_"))
        } else {
            format!("{}.pdf", stem)
        }
    }
}

fn summary_message(folder_name: &str, saved: usize, failed: usize) -> String {
    match (saved, failed) {
        (_, 0) => format!("Articles saved as PDFs in {} folder", folder_name),
        (0, _) => format!("No articles could be saved in {} folder ({} failed)", folder_name, failed),
        _ => format!(
            "Saved {} of {} articles as PDFs in {} folder ({} failed)",
            saved,
            saved + failed,
            folder_name,
            failed
        ),
    }
}
