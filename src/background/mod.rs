//! Background feed loading on a tokio runtime

pub mod loader;

pub use loader::{load_all, FeedLoader};
