pub mod index;

pub use index::{IndexedMarker, MarkerIndex};
