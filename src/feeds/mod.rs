//! Loading the two remote feeds and turning them into map layers.
//!
//! Each feed produces exactly one [`FeedEvent`]; failures travel inside the
//! event instead of being dropped.

pub mod boundaries;
pub mod fetch;
pub mod seismic;

use crate::{data::geojson::GeoJson, data::seismic::SeismicFeed, Result};

pub use boundaries::{build_boundary_layer, load_boundaries, parse_boundaries};
pub use fetch::{FeedFetcher, HttpFetcher};
pub use seismic::{build_marker_group, load_seismic, marker_for, parse_seismic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Seismic,
    Boundaries,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::Seismic => write!(f, "earthquake feed"),
            FeedKind::Boundaries => write!(f, "plate boundary feed"),
        }
    }
}

/// Outcome of one feed download
#[derive(Debug)]
pub enum FeedEvent {
    Seismic(Result<SeismicFeed>),
    Boundaries(Result<GeoJson>),
}

impl FeedEvent {
    pub fn kind(&self) -> FeedKind {
        match self {
            FeedEvent::Seismic(_) => FeedKind::Seismic,
            FeedEvent::Boundaries(_) => FeedKind::Boundaries,
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            FeedEvent::Seismic(result) => result.is_ok(),
            FeedEvent::Boundaries(result) => result.is_ok(),
        }
    }
}
