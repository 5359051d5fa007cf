use bevy::prelude::*;

/// Axis-aligned bounds tracked point by point.
///
/// Used for cluster centroids (box midpoint, not the mean) and for framing
/// the camera around the loaded cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisBounds {
    /// Create empty bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min: Vec3::INFINITY,
            max: Vec3::NEG_INFINITY,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::new();
        for point in points {
            bounds.update(point);
        }
        bounds
    }

    /// Grow the bounds to contain a new point
    pub fn update(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Midpoint of the min and max corners.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_box_midpoint_not_mean() {
        let bounds = AxisBounds::from_points([Vec3::ZERO, Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);
        assert_eq!(bounds.center(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn new_bounds_are_empty_until_updated() {
        let mut bounds = AxisBounds::new();
        assert!(bounds.is_empty());
        bounds.update(Vec3::new(1.0, -2.0, 3.0));
        assert!(!bounds.is_empty());
        assert_eq!(bounds.size(), Vec3::ZERO);
    }
}
