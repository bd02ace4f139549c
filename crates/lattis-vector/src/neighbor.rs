//! Search result element shared by every index in the workspace.

/// A neighbor returned from vector search: dense node id plus distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Dense node id assigned at insertion time.
    pub id: u32,
    /// Distance to the query (lower = more similar).
    pub distance: f32,
}

impl Neighbor {
    /// Create a new neighbor.
    pub fn new(id: u32, distance: f32) -> Self {
        Self { id, distance }
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Compare by distance first (total_cmp for NaN safety), then id so the
        // order is total and deterministic for equal distances.
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_ordering() {
        let a = Neighbor::new(0, 1.0);
        let b = Neighbor::new(1, 2.0);
        let c = Neighbor::new(2, 0.5);

        let mut neighbors = vec![a, b, c];
        neighbors.sort();

        assert_eq!(neighbors[0].id, 2);
        assert_eq!(neighbors[1].id, 0);
        assert_eq!(neighbors[2].id, 1);
    }

    #[test]
    fn test_equal_distance_breaks_ties_by_id() {
        let mut neighbors = vec![Neighbor::new(7, 1.0), Neighbor::new(3, 1.0)];
        neighbors.sort();
        assert_eq!(neighbors[0].id, 3);
        assert_eq!(neighbors[1].id, 7);
    }
}
