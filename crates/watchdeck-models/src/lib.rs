pub mod movie;
pub mod profile;

pub use movie::Movie;
pub use profile::{CollectionEntry, UserProfile};
