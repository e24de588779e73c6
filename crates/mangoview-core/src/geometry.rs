//! Axis-aligned geometry in page-image space.
//!
//! All page data is expressed in image pixels: symbol boxes come straight
//! from OCR output and pointer coordinates are mapped into the same space by
//! the host before they reach the hit tester.

use serde::{Deserialize, Serialize};

/// A point in page-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true when both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned bounding box.
///
/// Serialized the way the page pipeline writes it: `{"min": [x, y], "max": [x, y]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    #[serde(with = "pair")]
    pub min: Point,
    #[serde(with = "pair")]
    pub max: Point,
}

impl Aabb {
    /// Creates a box from its corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    /// Returns true when the box is finite and `min <= max` on both axes.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn half_width(&self) -> f64 {
        self.width() * 0.5
    }

    /// Center of the box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Returns true when the point lies inside or on the edge of the box.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
        )
    }

    /// Bounding box of a sequence of boxes, `None` when the sequence is empty.
    pub fn enclosing<'a, I>(boxes: I) -> Option<Aabb>
    where
        I: IntoIterator<Item = &'a Aabb>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Aabb>, b| match acc {
                Some(acc) => Some(acc.union(b)),
                None => Some(*b),
            })
    }

    /// Squared distance from `point` to the box.
    ///
    /// The point is clamped into the box and the distance to the clamped
    /// point is returned, so any point inside the box yields zero.
    pub fn squared_distance_to(&self, point: Point) -> f64 {
        let cx = point.x.max(self.min.x).min(self.max.x);
        let cy = point.y.max(self.min.y).min(self.max.y);
        let dx = point.x - cx;
        let dy = point.y - cy;
        dx * dx + dy * dy
    }

    /// Highlighter rectangle for this box.
    ///
    /// Both extents are scaled by `factor` around the center and the vertical
    /// extent is raised to at least the horizontal one, so thin glyphs such as
    /// `ー` still get a visible marker.
    pub fn inflated_square(&self, factor: f64) -> Aabb {
        let c = self.center();
        let ex = self.width() * 0.5 * factor;
        let ey = (self.height() * 0.5 * factor).max(ex);
        Aabb::new(c.x - ex, c.y - ey, c.x + ex, c.y + ey)
    }
}

mod pair {
    use super::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(p: &Point, s: S) -> Result<S::Ok, S::Error> {
        [p.x, p.y].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
        let [x, y] = <[f64; 2]>::deserialize(d)?;
        Ok(Point::new(x, y))
    }
}
