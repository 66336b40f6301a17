use nalgebra::{Point3, Vector3};

/// An orthorhombic periodic simulation box.
///
/// Dimensions are edge lengths in angstroms. Triclinic cells are out of
/// scope; the box is fully described by its three edge lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    dimensions: Vector3<f64>,
}

impl PeriodicBox {
    pub fn new(dimensions: Vector3<f64>) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }
}

/// An axis-aligned bounding box over a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABox {
    minimum: Point3<f64>,
    maximum: Point3<f64>,
}

impl AABox {
    /// Builds the tightest box containing all points in the iterator.
    ///
    /// An empty iterator yields the degenerate box at the origin.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let mut aabox = Self {
            minimum: first,
            maximum: first,
        };
        for point in iter {
            aabox.expand_to(&point);
        }
        aabox
    }

    /// Grows the box just enough to contain the given point.
    pub fn expand_to(&mut self, point: &Point3<f64>) {
        for i in 0..3 {
            if point[i] < self.minimum[i] {
                self.minimum[i] = point[i];
            }
            if point[i] > self.maximum[i] {
                self.maximum[i] = point[i];
            }
        }
    }

    pub fn minimum(&self) -> &Point3<f64> {
        &self.minimum
    }

    pub fn maximum(&self) -> &Point3<f64> {
        &self.maximum
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.minimum, &self.maximum)
    }

    /// The box size along each axis.
    pub fn extent(&self) -> Vector3<f64> {
        self.maximum - self.minimum
    }
}

impl Default for AABox {
    fn default() -> Self {
        Self {
            minimum: Point3::origin(),
            maximum: Point3::origin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_box_reports_dimensions_and_volume() {
        let pbox = PeriodicBox::new(Vector3::new(10.0, 20.0, 30.0));
        assert_eq!(pbox.dimensions(), &Vector3::new(10.0, 20.0, 30.0));
        assert_eq!(pbox.volume(), 6000.0);
    }

    #[test]
    fn aabox_from_points_spans_all_points() {
        let aabox = AABox::from_points([
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.5, 0.0, 5.0),
        ]);
        assert_eq!(aabox.minimum(), &Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabox.maximum(), &Point3::new(1.0, 4.0, 5.0));
        assert_eq!(aabox.extent(), Vector3::new(2.0, 6.0, 5.0));
    }

    #[test]
    fn aabox_from_empty_iterator_is_degenerate_at_origin() {
        let aabox = AABox::from_points(std::iter::empty());
        assert_eq!(aabox.minimum(), &Point3::origin());
        assert_eq!(aabox.maximum(), &Point3::origin());
        assert_eq!(aabox.extent(), Vector3::zeros());
    }

    #[test]
    fn aabox_from_single_point_is_degenerate_at_that_point() {
        let p = Point3::new(2.0, 2.0, 2.0);
        let aabox = AABox::from_points([p]);
        assert_eq!(aabox.minimum(), &p);
        assert_eq!(aabox.maximum(), &p);
        assert_eq!(aabox.center(), p);
    }

    #[test]
    fn expand_to_grows_only_where_needed() {
        let mut aabox = AABox::from_points([Point3::origin(), Point3::new(1.0, 1.0, 1.0)]);
        aabox.expand_to(&Point3::new(0.5, 2.0, -1.0));
        assert_eq!(aabox.minimum(), &Point3::new(0.0, 0.0, -1.0));
        assert_eq!(aabox.maximum(), &Point3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn center_is_midpoint_of_extremes() {
        let aabox = AABox::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 6.0, 8.0)]);
        assert_eq!(aabox.center(), Point3::new(2.0, 3.0, 4.0));
    }
}
