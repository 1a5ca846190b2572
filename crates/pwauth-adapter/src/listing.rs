//! Line-by-line scanning of the flat account file.

use crate::account::AccountRecord;
use pwauth_core::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Window of matches requested by a bulk retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    start: usize,
    limit: Option<usize>,
}

impl Page {
    /// Every match, from the first.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: 0,
            limit: None,
        }
    }

    /// Skips `start` matches and keeps at most `limit`; a zero `limit` is unlimited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if either value is negative.
    pub fn new(start: i64, limit: i64) -> Result<Self> {
        let start = usize::try_from(start)
            .map_err(|_| Error::InvalidRequest(format!("start must not be negative, got {start}")))?;
        let limit = usize::try_from(limit)
            .map_err(|_| Error::InvalidRequest(format!("limit must not be negative, got {limit}")))?;

        Ok(Self {
            start,
            limit: (limit > 0).then_some(limit),
        })
    }

    /// Number of leading matches to skip.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns true once `taken` entries fill the page.
    #[must_use]
    pub fn is_full(&self, taken: usize) -> bool {
        self.limit.is_some_and(|limit| taken >= limit)
    }
}

/// Read-only handle on a flat account file.
#[derive(Debug, Clone)]
pub(crate) struct AccountFile {
    path: PathBuf,
}

impl AccountFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) async fn open(&self) -> Result<AccountLines> {
        let file = File::open(&self.path).await?;
        Ok(AccountLines {
            reader: BufReader::new(file),
            buf: Vec::new(),
            path: self.path.clone(),
            line_no: 0,
        })
    }
}

/// Cursor over the records of an open account file.
pub(crate) struct AccountLines {
    reader: BufReader<File>,
    buf: Vec<u8>,
    path: PathBuf,
    line_no: usize,
}

impl AccountLines {
    /// Next record that passes the root/service-account exclusion.
    ///
    /// Blank lines and `#` comments are skipped silently, malformed lines with a warning.
    /// Bytes that are not UTF-8 (legacy Latin-1 gecos fields) are decoded lossily.
    pub(crate) async fn next_listable(&mut self) -> Result<Option<AccountRecord>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = String::from_utf8_lossy(&self.buf);
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match AccountRecord::parse_line(trimmed) {
                Ok(record) if record.is_listable() => return Ok(Some(record)),
                Ok(_) => {}
                Err(err) => warn!(
                    path = %self.path.display(),
                    line = self.line_no,
                    "skipping account line: {err}"
                ),
            }
        }
    }
}
