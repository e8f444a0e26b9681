pub mod cache;
#[cfg(feature = "tokio-runtime")]
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::TileCache;
#[cfg(feature = "tokio-runtime")]
pub use loader::{TileLoader, TileResult};
pub use source::{TileSource, UrlTemplate};
