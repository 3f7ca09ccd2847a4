use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed DLL {id}: {reason}")]
    MalformedModule { id: String, reason: String },

    #[error("Malformed DLLS.tab: length {len:#x} is not a multiple of the {record_size}-byte record size")]
    MalformedTable { len: usize, record_size: usize },

    #[error("File not found @ {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Invalid DLL number: {0:?}")]
    InvalidDllId(String),

    #[error("DLL {id} is not listed in DLLS.tab ({count} entries)")]
    DllNotInTable { id: String, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Error::MalformedModule {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
