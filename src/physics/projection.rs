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

//! Mapping of simulated poses to display space.
//!
//! With zero display angle the mapping is orthographic: positions are converted to display units
//! and shifted by the display offset. With non-zero angle every object is scaled by its depth
//! `s = 1 + y * display_angle`, which gives a cheap pseudo-3D look when combined with
//! [`depth_order`] draw sorting.

use crate::{core::algebra::Vector2, physics::vector_to_display};
use std::cmp::Ordering;

/// Result of projecting a single pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projected {
    /// Orthographic projection, scale is left untouched.
    Flat {
        position: Vector2<f32>,
        rotation: f32,
    },
    Perspective {
        position: Vector2<f32>,
        scale: f32,
        rotation: f32,
    },
    /// The pose is behind the viewer and negative depth is not displayed.
    Culled,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// Subtracted from display positions.
    pub offset: Vector2<f32>,
    /// Perspective tilt. Zero means orthographic.
    pub display_angle: f32,
    /// Vertical squash of perspective positions.
    pub perspective_ratio: f32,
    /// Whether poses with negative depth scale are still displayed.
    pub display_negative: bool,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            offset: Vector2::default(),
            display_angle: 0.0,
            perspective_ratio: 1.0,
            display_negative: false,
        }
    }
}

impl Projection {
    pub fn is_perspective(&self) -> bool {
        self.display_angle != 0.0
    }

    /// Projects a simulated position (in simulation units) and angle.
    pub fn project(&self, position: Vector2<f32>, angle: f32) -> Projected {
        let raw = vector_to_display(position) - self.offset;

        if !self.is_perspective() {
            return Projected::Flat {
                position: raw,
                rotation: angle,
            };
        }

        let s = 1.0 + raw.y * self.display_angle;
        if s < 0.0 && !self.display_negative {
            return Projected::Culled;
        }

        Projected::Perspective {
            position: Vector2::new(raw.x * s, raw.y * s / self.perspective_ratio),
            scale: s,
            rotation: angle,
        }
    }
}

/// Painter's order of two display positions: ascending y, ties broken by ascending |x|.
pub fn depth_order(a: &Vector2<f32>, b: &Vector2<f32>) -> Ordering {
    a.y.total_cmp(&b.y)
        .then_with(|| a.x.abs().total_cmp(&b.x.abs()))
}
