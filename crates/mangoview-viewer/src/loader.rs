//! Page loading with stale-response protection.
//!
//! Every navigation request gets a fresh [`LoadToken`]. Only the response
//! carrying the latest token may replace the displayed page; anything older
//! is discarded. A failed load leaves the last good page in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mangoview_core::{LoadError, Page};
use mangoview_settings::PageSettings;
use tracing::{info, warn};

/// Identifies one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A page fetch the host should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub index: usize,
    pub token: LoadToken,
}

/// Result of completing a request.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The page is now current.
    Applied { index: usize, page: Arc<Page> },
    /// A newer request superseded this one.
    Stale { index: usize, token: LoadToken },
    /// The load failed; the last good page stays current.
    Recovered { index: usize, error: LoadError },
    /// The load failed and no page was ever loaded.
    Failed { error: LoadError },
}

/// Tracks the current page and the latest navigation request.
#[derive(Debug, Default)]
pub struct PageLoader {
    next_token: u64,
    latest: Option<LoadRequest>,
    current: Option<(usize, Arc<Page>)>,
}

impl PageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a request for `index`, superseding any request in flight.
    pub fn request(&mut self, index: usize) -> LoadRequest {
        self.next_token += 1;
        let request = LoadRequest {
            index,
            token: LoadToken(self.next_token),
        };
        self.latest = Some(request);
        request
    }

    /// Request still waiting for its response.
    pub fn pending(&self) -> Option<LoadRequest> {
        self.latest
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().map(|(index, _)| *index)
    }

    pub fn current_page(&self) -> Option<&Arc<Page>> {
        self.current.as_ref().map(|(_, page)| page)
    }

    /// Applies the response for `request`.
    pub fn complete(
        &mut self,
        request: LoadRequest,
        result: Result<Page, LoadError>,
    ) -> LoadOutcome {
        if self.latest != Some(request) {
            warn!(
                "Discarding stale page {} (token {})",
                request.index,
                request.token.value()
            );
            return LoadOutcome::Stale {
                index: request.index,
                token: request.token,
            };
        }
        self.latest = None;

        match result {
            Ok(page) => {
                let page = Arc::new(page);
                info!(
                    "Page {} loaded with {} symbols",
                    request.index,
                    page.symbol_count()
                );
                self.current = Some((request.index, Arc::clone(&page)));
                LoadOutcome::Applied {
                    index: request.index,
                    page,
                }
            }
            Err(error) => match self.current_index() {
                Some(index) => {
                    warn!("{}; staying on page {}", error, index);
                    LoadOutcome::Recovered { index, error }
                }
                None => {
                    warn!("{}", error);
                    LoadOutcome::Failed { error }
                }
            },
        }
    }
}

/// Source of page metadata.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches and validates the page at `index`.
    async fn fetch(&self, index: usize) -> Result<Page, LoadError>;
}

/// Reads `{prefix}{index}.json` files from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryPageSource {
    directory: PathBuf,
    file_prefix: String,
}

impl DirectoryPageSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: "page".to_string(),
        }
    }

    pub fn from_settings(settings: &PageSettings) -> Self {
        Self {
            directory: settings.directory.clone(),
            file_prefix: settings.file_prefix.clone(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn page_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}{}.json", self.file_prefix, index))
    }
}

#[async_trait]
impl PageSource for DirectoryPageSource {
    async fn fetch(&self, index: usize) -> Result<Page, LoadError> {
        let path = self.page_path(index);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LoadError::NotFound { index },
                _ => LoadError::Io {
                    index,
                    reason: format!("{}: {}", path.display(), e),
                },
            })?;
        Page::from_json(&json).map_err(|source| LoadError::Invalid { index, source })
    }
}
