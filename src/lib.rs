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

//! Rigid body physics for a retained 2D scene graph.
//!
//! Scene nodes of [`scene2d::node::Node::PhysicsObject`] kind carry a description of a rigid body
//! (its type and fixtures). Once added to a [`physics::PhysicsWorld`], every object gets a native
//! rapier body and its pose is copied back onto the node after every simulation step, optionally
//! through a pseudo-3D perspective projection with painter's sorting of the world's children.
//!
//! Scene and simulation use different units: display units (pixels) in the scene and meters in
//! the simulation, see [`physics::DISPLAY_UNITS_PER_METER`].

pub use scene2d_core as core;

pub mod error;
pub mod physics;
pub mod scene2d;
