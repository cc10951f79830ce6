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

//! Local transform of a scene node.

use crate::core::algebra::{Matrix3, Vector2};

/// Position, rotation (radians) and scale of a node relative to its parent. Transformations are
/// applied in scale, rotation, translation order.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    position: Vector2<f32>,
    scale: Vector2<f32>,
    rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector2::new(0.0, 0.0),
            scale: Vector2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn set_position(&mut self, position: Vector2<f32>) -> &mut Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position
    }

    pub fn set_x(&mut self, x: f32) -> &mut Self {
        self.position.x = x;
        self
    }

    pub fn set_y(&mut self, y: f32) -> &mut Self {
        self.position.y = y;
        self
    }

    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_scale(&mut self, scale: Vector2<f32>) -> &mut Self {
        self.scale = scale;
        self
    }

    /// Sets the same scale on both axes.
    pub fn set_uniform_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = Vector2::new(scale, scale);
        self
    }

    pub fn scale(&self) -> Vector2<f32> {
        self.scale
    }

    pub fn offset(&mut self, offset: Vector2<f32>) -> &mut Self {
        self.position += offset;
        self
    }

    /// 2D homogeneous matrix of the transform.
    pub fn matrix(&self) -> Matrix3<f32> {
        Matrix3::new_translation(&self.position)
            * Matrix3::new_rotation(self.rotation)
            * Matrix3::new_nonuniform_scaling(&self.scale)
    }
}

pub struct TransformBuilder {
    position: Vector2<f32>,
    scale: Vector2<f32>,
    rotation: f32,
}

impl Default for TransformBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformBuilder {
    pub fn new() -> Self {
        Self {
            position: Default::default(),
            scale: Vector2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }

    pub fn with_position(mut self, position: Vector2<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vector2<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn build(self) -> Transform {
        Transform {
            position: self.position,
            scale: self.scale,
            rotation: self.rotation,
        }
    }
}

#[cfg(test)]
mod test {
    use super::TransformBuilder;
    use crate::core::algebra::{Point2, Vector2};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn matrix_scales_then_rotates_then_translates() {
        let transform = TransformBuilder::new()
            .with_position(Vector2::new(10.0, 0.0))
            .with_rotation(FRAC_PI_2)
            .with_scale(Vector2::new(2.0, 2.0))
            .build();

        let p = transform.matrix().transform_point(&Point2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1.0e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1.0e-5);
    }
}
