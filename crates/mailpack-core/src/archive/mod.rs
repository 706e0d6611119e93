//! Zip bundles: building them from local files and extracting them into
//! install directories.

mod bundle;
mod extract;

pub use bundle::ArchiveBundle;
pub use extract::ArchiveExtractor;
