//! Contact Book - Assistant Bot Library
//!
//! A command-driven contact directory with:
//! - Flat-file persistence (one `name:phone` record per line)
//! - An interactive session with verb completion and hints
//! - Error recovery that offers to add a missing contact in-session
//!
//! # Example
//!
//! ```ignore
//! use contact_book::store::ContactStore;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = ContactStore::with_path("contacts.txt".into());
//!     store.append("Ann", "123")?;
//!     println!("{}", store.find_one("Ann")?);
//!     Ok(())
//! }
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod store;   // Must come before commands since commands depends on store
pub mod commands;
pub mod config;
pub mod repl;
pub mod cli;

// Re-export commonly used types for convenience
pub use commands::{
    dispatch, parse_input,
    Command, CommandError, Reply,
};

pub use commands::recovery::Prompter;

pub use store::{
    ContactRecord,
    Contacts,
    ContactStore,
    StoreError,
};

pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Assistant Bot Library", NAME, VERSION)
}
