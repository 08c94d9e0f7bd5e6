//! Persistent contact store - flat text file, one `name:phone` record per line
//!
//! The file is fully re-read at the start of every command and written back
//! after every mutation; nothing is cached across commands. Each operation
//! opens the backing file only for the duration of the call.

pub mod codec;

pub use codec::{decode_record, encode_record, ContactRecord, Contacts, SEPARATOR};

use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure modes of the persistent store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup of a name with no record in the store
    #[error("contact '{0}' not found")]
    ContactNotFound(String),
    /// A line on disk with no field separator
    #[error("malformed record on line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },
    /// The format defines no escaping for the separator
    #[error("name {0:?} contains the field separator")]
    SeparatorInName(String),
    /// Any I/O failure other than "file absent" on read
    #[error("contact store unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// Flat-file contact store
///
/// Repeated appends of the same name leave duplicate lines on disk; the
/// last one wins when the file is read back. `rewrite_all` collapses them.
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Store at the configured location, creating the data directory
    pub fn new() -> anyhow::Result<Self> {
        let path = crate::config::store_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create data directory")?;
        }
        Ok(Self { path })
    }

    /// Store at a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The backing file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been created yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record into an ordered set. An absent file is an empty
    /// store, not an error.
    pub fn load_all(&self) -> Result<Contacts, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Contacts::new()),
            Err(e) => return Err(e.into()),
        };

        let mut contacts = Contacts::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = codec::decode_record(line, idx + 1)?;
            contacts.upsert(&record.name, &record.phone);
        }
        Ok(contacts)
    }

    /// Append one record, creating the file if absent. Never rewrites
    /// existing lines.
    pub fn append(&self, name: &str, phone: &str) -> Result<(), StoreError> {
        let line = codec::encode_record(name, phone)?;
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        debug!("Appended record for {} to {}", name, self.path.display());
        Ok(())
    }

    /// Rewrite the whole file from `contacts`, in order. Used after an
    /// in-place update so exactly one logical record per name remains.
    pub fn rewrite_all(&self, contacts: &Contacts) -> Result<(), StoreError> {
        let mut out = String::new();
        for record in contacts.iter() {
            out.push_str(&codec::encode_record(&record.name, &record.phone)?);
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        debug!("Rewrote {} records to {}", contacts.len(), self.path.display());
        Ok(())
    }

    /// Look up one phone number, loading the full record set
    pub fn find_one(&self, name: &str) -> Result<String, StoreError> {
        let contacts = self.load_all()?;
        contacts
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| StoreError::ContactNotFound(name.to_string()))
    }
}
