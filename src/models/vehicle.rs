//! Vehicle type.

use serde::{Deserialize, Serialize};

/// A capacity-limited vehicle that starts and ends at the shared depot.
///
/// # Examples
///
/// ```
/// use u_pickup::models::Vehicle;
///
/// let v = Vehicle::new(0, 10);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity.
    pub fn new(id: usize, capacity: i32) -> Self {
        Self { id, capacity }
    }

    /// Builds a fleet from a capacity list; vehicle ids follow list order.
    pub fn fleet(capacities: &[i32]) -> Vec<Vehicle> {
        capacities
            .iter()
            .enumerate()
            .map(|(id, &capacity)| Vehicle::new(id, capacity))
            .collect()
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new(2, 5);
        assert_eq!(v.id(), 2);
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn test_fleet() {
        let fleet = Vehicle::fleet(&[10, 4, 7]);
        assert_eq!(fleet.len(), 3);
        assert_eq!(fleet[1].id(), 1);
        assert_eq!(fleet[1].capacity(), 4);
    }
}
