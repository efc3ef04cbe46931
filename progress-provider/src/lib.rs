#[cfg(feature = "fs")]
mod fs;

#[cfg(feature = "fs")]
pub use fs::JsonFileSource;

#[cfg(feature = "anki")]
mod anki;

#[cfg(feature = "anki")]
pub use anki::AnkiSource;
