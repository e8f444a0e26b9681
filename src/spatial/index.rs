use crate::core::geo::{LatLng, LatLngBounds};

use rstar::{RTree, RTreeObject, AABB};

/// Marker position stored in the R-tree, as `[lng, lat]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMarker {
    /// Position of the marker inside its group
    pub index: usize,
    pub position: [f64; 2],
}

impl RTreeObject for IndexedMarker {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// R-tree over marker positions, used to narrow click hit tests and to
/// count markers inside the current view
pub struct MarkerIndex {
    rtree: RTree<IndexedMarker>,
}

impl MarkerIndex {
    pub fn new() -> Self {
        Self { rtree: RTree::new() }
    }

    /// Bulk-load positions; the i-th position gets index i
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = LatLng>,
    {
        let items = positions
            .into_iter()
            .enumerate()
            .map(|(index, p)| IndexedMarker {
                index,
                position: [p.lng, p.lat],
            })
            .collect();
        Self {
            rtree: RTree::bulk_load(items),
        }
    }

    pub fn insert(&mut self, index: usize, position: LatLng) {
        self.rtree.insert(IndexedMarker {
            index,
            position: [position.lng, position.lat],
        });
    }

    /// Indices of markers whose position lies within `bounds`, ascending
    pub fn query(&self, bounds: &LatLngBounds) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [bounds.south_west.lng, bounds.south_west.lat],
            [bounds.north_east.lng, bounds.north_east.lat],
        );
        let mut hits: Vec<usize> = self
            .rtree
            .locate_in_envelope(&envelope)
            .map(|item| item.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }
}

impl Default for MarkerIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_returns_sorted_indices_inside_bounds() {
        let index = MarkerIndex::from_positions(vec![
            LatLng::new(35.0, -100.0),
            LatLng::new(-20.0, 170.0),
            LatLng::new(36.0, -99.0),
        ]);

        let hits = index.query(&LatLngBounds::from_coords(30.0, -105.0, 40.0, -95.0));
        assert_eq!(hits, vec![0, 2]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_insert_and_empty() {
        let mut index = MarkerIndex::new();
        assert!(index.is_empty());
        index.insert(7, LatLng::new(1.0, 1.0));
        assert_eq!(index.query(&LatLngBounds::from_coords(0.0, 0.0, 2.0, 2.0)), vec![7]);
    }
}
