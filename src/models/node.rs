//! Point and node types.

use serde::{Deserialize, Serialize};

/// A location in the plane.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A location to visit (or the depot) in a pickup run.
///
/// In graph mode the `id` is the road-network vertex the node sits on;
/// in Euclidean mode it is just a label. The depot carries demand 0.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Node;
///
/// let depot = Node::depot(7, 35.0, 35.0);
/// assert_eq!(depot.id(), 7);
/// assert_eq!(depot.demand(), 0);
///
/// let n = Node::new(1, 41.0, 49.0, 1);
/// assert_eq!(n.demand(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    point: Point,
    demand: i32,
}

impl Node {
    /// Creates a node.
    pub fn new(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Self {
            id,
            point: Point::new(x, y),
            demand,
        }
    }

    /// Creates a depot node (demand 0).
    pub fn depot(id: usize, x: f64, y: f64) -> Self {
        Self::new(id, x, y, 0)
    }

    /// Node identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Location of this node.
    pub fn point(&self) -> Point {
        self.point
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.point.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.point.y
    }

    /// Capacity consumed when a vehicle visits this node.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        self.point.distance_to(&other.point)
    }
}
