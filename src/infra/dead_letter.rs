//! Stores for distributions that could not be delivered.
//!
//! The file store appends one JSON line per dead letter so an operator can
//! inspect or replay them after the fact.

use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{Distribution, KitchenError};
use crate::util::clock::now_ms;

/// An undeliverable distribution and why it failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetter {
    /// The distribution as it would have been sent.
    pub distribution: Distribution,
    /// Delivery attempts made.
    pub attempts: u32,
    /// Last error.
    pub reason: String,
    /// Timestamp milliseconds.
    pub failed_at_ms: u128,
}

impl DeadLetter {
    /// Stamp a failed delivery with the current time.
    #[must_use]
    pub fn new(distribution: Distribution, attempts: u32, reason: impl Into<String>) -> Self {
        Self {
            distribution,
            attempts,
            reason: reason.into(),
            failed_at_ms: now_ms(),
        }
    }
}

/// Destination for dead letters.
pub trait DeadLetterStore: Send + Sync {
    /// Persist a dead letter.
    fn store(&self, letter: DeadLetter) -> Result<(), KitchenError>;
}

/// Keeps dead letters in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct InMemoryDeadLetter {
    letters: Arc<Mutex<Vec<DeadLetter>>>,
}

impl InMemoryDeadLetter {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored letters.
    #[must_use]
    pub fn letters(&self) -> Vec<DeadLetter> {
        self.letters.lock().clone()
    }
}

impl DeadLetterStore for InMemoryDeadLetter {
    fn store(&self, letter: DeadLetter) -> Result<(), KitchenError> {
        self.letters.lock().push(letter);
        Ok(())
    }
}

/// Appends dead letters to a JSONL file.
pub struct JsonlDeadLetter {
    path: PathBuf,
    write: Mutex<()>,
}

impl JsonlDeadLetter {
    /// Use `path`, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// `Io` if the directory cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, KitchenError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            write: Mutex::new(()),
        })
    }

    /// File the letters are appended to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored letter back, oldest first.
    ///
    /// # Errors
    ///
    /// `Io` or `Serde` on an unreadable file or line.
    pub fn load(&self) -> Result<Vec<DeadLetter>, KitchenError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(&self.path)?;
        let mut letters = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            letters.push(serde_json::from_str(&line)?);
        }
        Ok(letters)
    }
}

impl DeadLetterStore for JsonlDeadLetter {
    fn store(&self, letter: DeadLetter) -> Result<(), KitchenError> {
        let line = serde_json::to_string(&letter)?;
        let _guard = self.write.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
