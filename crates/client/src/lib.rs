//! Content sources for show-details.
//!
//! This crate provides the HTTP fetch pipeline, the blog archive scraper,
//! content extraction, and the content repository client shared by the CLI.

pub mod archive;
pub mod blog;
pub mod dates;
pub mod extract;
pub mod fetch;
pub mod repository;
pub mod telemetry;

pub use archive::{ArchiveLocator, BlogLink, PageFetcher, PostWindow};
pub use blog::BlogSource;
pub use dates::{parse_day, parse_month};
pub use extract::{ContentExtractor, extract};
pub use fetch::{FetchClient, FetchConfig};
pub use repository::{RepositoryClient, RepositoryConfig, RepositoryError, RepositorySource};
