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

//! Debug drawing of physics worlds. See [`DebugDrawingContext`] docs for more info.

use crate::core::algebra::Vector2;
use rapier2d::{
    math::{Point, Real},
    pipeline::{DebugRenderBackend, DebugRenderObject},
};

/// Colored line between two points, in display space.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub begin: Vector2<f32>,
    pub end: Vector2<f32>,
    /// Hue (degrees), saturation, lightness and alpha.
    pub color: [f32; 4],
}

/// Collects lines produced by [`crate::physics::PhysicsWorld::draw`]. The actual drawing is up to
/// the renderer, the context only accumulates geometry. Lines are already converted to display
/// units and shifted by the display offset of the world (perspective is not applied).
///
/// The context is not cleared automatically, call [`Self::clear_lines`] once the lines were
/// rendered.
#[derive(Default, Clone, Debug)]
pub struct DebugDrawingContext {
    /// List of lines to draw.
    pub lines: Vec<Line>,
    pub(crate) offset: Vector2<f32>,
}

impl DebugRenderBackend for DebugDrawingContext {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        self.add_line(Line {
            begin: super::vector_to_display(a.coords) - self.offset,
            end: super::vector_to_display(b.coords) - self.offset,
            color,
        })
    }
}

impl DebugDrawingContext {
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }
}
