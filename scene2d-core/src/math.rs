// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Small math helpers that nalgebra does not provide out of the box.

use crate::algebra::{Matrix3, Point2, Vector2};

/// Axis-aligned rectangle defined by its top-left corner and size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    /// Top-left corner.
    pub position: Vector2<f32>,
    /// Width and height, never negative.
    pub size: Vector2<f32>,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            size: Vector2::new(w, h),
        }
    }

    /// Smallest rectangle that contains every given point. `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector2<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut rect = Self {
            position: first,
            size: Vector2::default(),
        };
        for point in points {
            rect.push(point);
        }
        Some(rect)
    }

    /// Extends the rectangle so it contains the point.
    pub fn push(&mut self, p: Vector2<f32>) {
        let min = Vector2::new(self.position.x.min(p.x), self.position.y.min(p.y));
        let max = Vector2::new(
            (self.position.x + self.size.x).max(p.x),
            (self.position.y + self.size.y).max(p.y),
        );
        self.position = min;
        self.size = max - min;
    }

    /// Extends the rectangle so it contains the other one.
    pub fn extend_to_contain(&mut self, other: Rect) {
        self.push(other.position);
        self.push(other.position + other.size);
    }

    /// Corners in clockwise order starting at the top-left one.
    pub fn corners(&self) -> [Vector2<f32>; 4] {
        [
            self.position,
            Vector2::new(self.position.x + self.size.x, self.position.y),
            self.position + self.size,
            Vector2::new(self.position.x, self.position.y + self.size.y),
        ]
    }

    /// Bounds of this rectangle after transforming it with a 2D homogeneous matrix.
    pub fn transform(&self, matrix: &Matrix3<f32>) -> Rect {
        // Four corners are never empty.
        Self::from_points(
            self.corners()
                .iter()
                .map(|c| matrix.transform_point(&Point2::from(*c)).coords),
        )
        .unwrap_or(*self)
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn h(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vector2<f32> {
        self.position + self.size.scale(0.5)
    }
}

#[cfg(test)]
mod test {
    use super::Rect;
    use crate::algebra::{Matrix3, Vector2};

    #[test]
    fn push_grows_in_every_direction() {
        let mut rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        rect.push(Vector2::new(-2.0, 3.0));
        assert_eq!(rect, Rect::new(-2.0, 0.0, 3.0, 3.0));
    }

    #[test]
    fn transform_by_scale_and_translation() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        let matrix = Matrix3::new_translation(&Vector2::new(5.0, -1.0))
            * Matrix3::new_nonuniform_scaling(&Vector2::new(2.0, 0.5));
        assert_eq!(rect.transform(&matrix), Rect::new(5.0, -1.0, 20.0, 2.0));
    }

    #[test]
    fn empty_point_set_has_no_bounds() {
        assert!(Rect::from_points(std::iter::empty()).is_none());
    }
}
