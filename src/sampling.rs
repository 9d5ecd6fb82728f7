//! Synthetic pickup locations for tests and benchmarks.
//!
//! # Algorithm
//!
//! [`SegmentSampler`] places points uniformly by length along a set of line
//! segments (a street network). Cumulative segment lengths are stored once;
//! each draw picks a target length in `[0, total)`, finds its segment with a
//! binary search over the prefix sums, and interpolates within it.
//!
//! # Complexity
//!
//! O(S) construction, O(log S) per sample, where S = number of segments.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PickupError, Result};
use crate::models::{Node, Point};

/// A straight street segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Segment {
    /// Creates a segment between two points.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Point at fraction `t` ∈ [0, 1] from start to end.
    pub fn lerp(&self, t: f64) -> Point {
        Point::new(
            self.start.x + t * (self.end.x - self.start.x),
            self.start.y + t * (self.end.y - self.start.y),
        )
    }
}

/// Length-weighted uniform sampler over segments.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_pickup::models::Point;
/// use u_pickup::sampling::{Segment, SegmentSampler};
///
/// let street = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
/// let sampler = SegmentSampler::new(&[street]).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let points = sampler.sample(&mut rng, 10);
/// assert_eq!(points.len(), 10);
/// assert!(points.iter().all(|p| p.y == 0.0 && (0.0..=100.0).contains(&p.x)));
/// ```
#[derive(Debug, Clone)]
pub struct SegmentSampler {
    segments: Vec<Segment>,
    /// `prefix[i]` = total length of `segments[..=i]`.
    prefix: Vec<f64>,
}

impl SegmentSampler {
    /// Builds the sampler.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if there are no segments, any endpoint is non-finite,
    /// or the total length is zero or not representable.
    pub fn new(segments: &[Segment]) -> Result<Self> {
        if segments.is_empty() {
            return Err(PickupError::invalid("no segments to sample from"));
        }
        if let Some(i) = segments
            .iter()
            .position(|s| !s.start.is_finite() || !s.end.is_finite())
        {
            return Err(PickupError::invalid(format!(
                "segment {i} has a non-finite endpoint"
            )));
        }

        let mut prefix = Vec::with_capacity(segments.len());
        let mut acc = 0.0;
        for s in segments {
            acc += s.length();
            prefix.push(acc);
        }
        if acc <= 0.0 {
            return Err(PickupError::invalid("segments have zero total length"));
        }
        if !acc.is_finite() {
            return Err(PickupError::invalid("total segment length overflows f64"));
        }

        Ok(Self {
            segments: segments.to_vec(),
            prefix,
        })
    }

    /// Total length of all segments.
    pub fn total_length(&self) -> f64 {
        self.prefix.last().copied().unwrap_or(0.0)
    }

    /// Draws `n` points uniformly by length.
    pub fn sample<R: Rng>(&self, rng: &mut R, n: usize) -> Vec<Point> {
        let total = self.total_length();
        (0..n)
            .map(|_| {
                let target = rng.random_range(0.0..total);
                self.point_at(target)
            })
            .collect()
    }

    /// Point at cumulative length `target` along the segment sequence.
    pub fn point_at(&self, target: f64) -> Point {
        // first segment whose cumulative end lies beyond the target; zero
        // length segments are skipped because their prefix equals the
        // previous one
        let idx = self
            .prefix
            .partition_point(|&end| end <= target)
            .min(self.segments.len() - 1);
        let before = if idx == 0 { 0.0 } else { self.prefix[idx - 1] };
        let seg = &self.segments[idx];
        let len = seg.length();
        let t = if len > 0.0 {
            ((target - before) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        seg.lerp(t)
    }
}

/// Draws `n` points uniformly in the box spanned by `min` and `max`.
///
/// A degenerate axis (equal bounds) yields that coordinate exactly.
pub fn uniform_in_bbox<R: Rng>(rng: &mut R, min: Point, max: Point, n: usize) -> Vec<Point> {
    let axis = |rng: &mut R, lo: f64, hi: f64| {
        if hi > lo {
            rng.random_range(lo..hi)
        } else {
            lo
        }
    };
    (0..n)
        .map(|_| {
            let x = axis(&mut *rng, min.x, max.x);
            let y = axis(&mut *rng, min.y, max.y);
            Point::new(x, y)
        })
        .collect()
}

/// Node list for a pickup run: the depot first (id 0, demand 0), then one
/// node per point with id `k` and demand 1.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Point;
/// use u_pickup::sampling::unit_demand_nodes;
///
/// let nodes = unit_demand_nodes(Point::new(0.0, 0.0), &[Point::new(1.0, 1.0)]);
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(nodes[0].demand(), 0);
/// assert_eq!(nodes[1].id(), 1);
/// assert_eq!(nodes[1].demand(), 1);
/// ```
pub fn unit_demand_nodes(depot: Point, points: &[Point]) -> Vec<Node> {
    std::iter::once(Node::depot(0, depot.x, depot.y))
        .chain(
            points
                .iter()
                .enumerate()
                .map(|(k, p)| Node::new(k + 1, p.x, p.y, 1)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn l_shape() -> Vec<Segment> {
        vec![
            Segment::new(Point::new(0.0, 0.0), Point::new(30.0, 0.0)),
            Segment::new(Point::new(30.0, 0.0), Point::new(30.0, 0.0)),
            Segment::new(Point::new(30.0, 0.0), Point::new(30.0, 10.0)),
        ]
    }

    #[test]
    fn test_point_at_walks_segments() {
        let sampler = SegmentSampler::new(&l_shape()).expect("valid");
        assert!((sampler.total_length() - 40.0).abs() < 1e-10);
        assert_eq!(sampler.point_at(0.0), Point::new(0.0, 0.0));
        assert_eq!(sampler.point_at(15.0), Point::new(15.0, 0.0));
        assert_eq!(sampler.point_at(35.0), Point::new(30.0, 5.0));
    }

    #[test]
    fn test_sampling_is_length_weighted() {
        let sampler = SegmentSampler::new(&l_shape()).expect("valid");
        let mut rng = StdRng::seed_from_u64(42);
        let points = sampler.sample(&mut rng, 4000);
        let on_long = points.iter().filter(|p| p.y == 0.0 && p.x < 30.0).count();
        let share = on_long as f64 / points.len() as f64;
        assert!((share - 0.75).abs() < 0.05, "share {share}");
    }

    #[test]
    fn test_seeded_sampling_repeats() {
        let sampler = SegmentSampler::new(&l_shape()).expect("valid");
        let a = sampler.sample(&mut StdRng::seed_from_u64(1), 50);
        let b = sampler.sample(&mut StdRng::seed_from_u64(1), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_segments() {
        assert!(SegmentSampler::new(&[]).is_err());
        let p = Point::new(1.0, 1.0);
        assert!(SegmentSampler::new(&[Segment::new(p, p)]).is_err());
        let bad = Segment::new(Point::new(f64::NAN, 0.0), p);
        assert!(SegmentSampler::new(&[bad]).is_err());
        let huge = Segment::new(Point::new(-1e308, -1e308), Point::new(1e308, 1e308));
        assert!(huge.length().is_infinite());
        assert!(SegmentSampler::new(&[huge]).is_err());
    }

    #[test]
    fn test_uniform_in_bbox() {
        let mut rng = StdRng::seed_from_u64(3);
        let pts = uniform_in_bbox(&mut rng, Point::new(-5.0, 2.0), Point::new(5.0, 2.0), 100);
        assert_eq!(pts.len(), 100);
        assert!(pts.iter().all(|p| (-5.0..5.0).contains(&p.x) && p.y == 2.0));
    }

    #[test]
    fn test_unit_demand_nodes() {
        let pts = [Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let nodes = unit_demand_nodes(Point::new(0.0, 0.0), &pts);
        let demands: Vec<i32> = nodes.iter().map(Node::demand).collect();
        assert_eq!(demands, vec![0, 1, 1]);
        assert_eq!(nodes[2].point(), pts[1]);
    }
}
