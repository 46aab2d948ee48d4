pub mod actions;
pub mod import;
pub mod store;

pub use import::parser::{ImportFormat, ImportRow};
pub use import::progress::ImportProgress;
pub use import::{ImportError, ImportOutcome, Importer};
pub use store::{JsonProfileStore, ProfileStore};
