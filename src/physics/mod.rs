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

//! Binding between rapier2d rigid bodies and scene graph nodes.
//!
//! A [`PhysicsObject`] is a scene node that carries a body template and fixture descriptors. Once
//! added to a [`PhysicsWorld`] it gets a native body, and every tick the world copies simulated
//! poses back onto the nodes, optionally projecting them with a pseudo-3D perspective.
//!
//! Simulation and display use different units, see [`DISPLAY_TO_SIM`].

pub mod config;
pub mod contact;
pub mod debug;
pub mod object;
pub mod projection;
pub mod shape;
pub mod world;

pub use self::{
    config::WorldOptions,
    contact::{ContactEvent, ContactKind, ContactListeners},
    debug::{DebugDrawingContext, Line},
    object::{
        BodyDef, CollisionFilter, ContactHandler, FixtureDesc, FixtureShape, ObjectOptions,
        PhysicsId, PhysicsObject, PhysicsObjectBuilder,
    },
    projection::{depth_order, Projected, Projection},
    shape::{CircleBuilder, EdgeBuilder, PolygonBuilder, RectangleBuilder},
    world::{PhysicsPerformanceStatistics, PhysicsWorld, WorldId},
};

use crate::core::algebra::Vector2;

/// How many display units make one meter of simulation space.
pub const DISPLAY_UNITS_PER_METER: f32 = 30.0;

/// Display to simulation conversion factor. Display lengths are multiplied by it, simulation
/// lengths are divided by it.
pub const DISPLAY_TO_SIM: f32 = 1.0 / DISPLAY_UNITS_PER_METER;

/// Mask that collides with every category.
pub const ALL_MASK_BITS: u32 = 0xFFFF;

#[inline]
pub fn to_sim(value: f32) -> f32 {
    value * DISPLAY_TO_SIM
}

#[inline]
pub fn to_display(value: f32) -> f32 {
    value / DISPLAY_TO_SIM
}

#[inline]
pub fn vector_to_sim(v: Vector2<f32>) -> Vector2<f32> {
    v.scale(DISPLAY_TO_SIM)
}

#[inline]
pub fn vector_to_display(v: Vector2<f32>) -> Vector2<f32> {
    v.unscale(DISPLAY_TO_SIM)
}
