//! Page storage module
//!
//! A page is a title/body pair. Stores map a title to the raw body bytes and
//! keep nothing in memory between calls.

mod file;

pub use file::FileStore;

use std::path::PathBuf;

/// A single wiki document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Page with an empty body, used when editing a page that does not exist yet
    pub fn blank(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }
}

/// Storage failure
///
/// Reads collapse every cause (missing file, permissions, ...) into `Read`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Key/blob store addressed by page title
///
/// Calls are synchronous and perform fresh I/O every time. No locking is done;
/// concurrent saves of one title race and the last completed write wins.
pub trait PageStore: Send + Sync {
    fn load(&self, title: &str) -> Result<Page, StoreError>;

    /// Create or fully overwrite the stored body for `page.title`
    fn save(&self, page: &Page) -> Result<(), StoreError>;
}
