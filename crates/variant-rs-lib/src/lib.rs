pub mod error;
pub use error::Result;
pub use error::Error;

pub mod platform;
pub use platform::PlatformTag;

pub mod catalog;
pub use catalog::Catalog;
pub use catalog::MemoryCatalog;

pub mod manifest;
pub use manifest::Manifest;

pub mod config;
pub use config::ResolverOptions;

pub mod relationship_resolver;
