//! File-backed page store
//!
//! One file per page, `<data_dir>/<title>.<extension>`, holding the raw body
//! with no header or framing.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Page, PageStore, StoreError};

/// Permission bits for newly created page files (owner read/write)
#[cfg(unix)]
const PAGE_FILE_MODE: u32 = 0o600;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    extension: String,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>, extension: impl Into<String>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            extension: extension.into(),
        })
    }

    /// File path for a title. Titles reaching here have passed path validation.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(format!("{title}.{}", self.extension))
    }
}

impl PageStore for FileStore {
    fn load(&self, title: &str) -> Result<Page, StoreError> {
        let path = self.path_for(title);
        match fs::read(&path) {
            Ok(body) => Ok(Page::new(title, body)),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.path_for(&page.title);
        write_page_file(&path, &page.body).map_err(|source| StoreError::Write { path, source })
    }
}

/// Create-or-truncate write; the mode only applies when the file is created
fn write_page_file(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PAGE_FILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(body)
}
