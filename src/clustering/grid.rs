//! Uniform grid spatial index for fixed-radius neighbour queries.

use std::collections::HashMap;

use crate::models::Point;

/// Buckets points into square cells of side `cell`.
///
/// A radius query with radius ≤ `cell` only needs the 3×3 block of cells
/// around the query point.
#[derive(Debug)]
pub struct GridIndex<'a> {
    points: &'a [Point],
    cell: f64,
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> GridIndex<'a> {
    /// Indexes `points` with the given cell side. `cell` must be positive.
    pub fn new(points: &'a [Point], cell: f64) -> Self {
        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            buckets.entry(Self::key(p, cell)).or_default().push(i);
        }
        Self {
            points,
            cell,
            buckets,
        }
    }

    fn key(p: &Point, cell: f64) -> (i64, i64) {
        ((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
    }

    /// Indices of all points within `radius` (inclusive) of point `i`,
    /// including `i` itself, in ascending order.
    ///
    /// `radius` must not exceed the cell side.
    pub fn within(&self, i: usize, radius: f64) -> Vec<usize> {
        let p = &self.points[i];
        let (cx, cy) = Self::key(p, self.cell);
        let mut found = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = self.buckets.get(&(cx.saturating_add(dx), cy.saturating_add(dy)))
                else {
                    continue;
                };
                found.extend(
                    bucket
                        .iter()
                        .copied()
                        .filter(|&j| p.distance_to(&self.points[j]) <= radius),
                );
            }
        }
        // far from the origin the cell keys saturate and neighbouring
        // offsets collapse onto one bucket
        found.sort_unstable();
        found.dedup();
        found
    }
}
