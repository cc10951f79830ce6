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

//! Errors of the physics binding.

use crate::{core::pool::Handle, physics::PhysicsId, scene2d::node::Node};
use std::{
    error::Error,
    fmt::{Display, Formatter},
};

/// Errors that may occur while registering physics objects or handling world options.
#[derive(Debug)]
pub enum PhysicsError {
    /// The handle does not point to a physics object.
    NotAPhysicsObject(Handle<Node>),
    /// The object already has a body, but it was created by another world. An object may belong
    /// to one world at a time.
    ForeignBody(PhysicsId),
    /// Another object with the same id is already registered in the world. Ids are unique per
    /// generator, so objects built with different generators may clash.
    DuplicateId(PhysicsId),
    /// The container node of the world was removed from the graph.
    ContainerRemoved,
    /// The engine could not build a shape out of a fixture descriptor, for instance a polygon
    /// with less than three non-collinear vertices.
    DegenerateShape {
        /// Owner of the fixture.
        object: Handle<Node>,
        /// Index of the fixture in the object's fixture list.
        fixture: usize,
    },
    /// An [std::io::Error] occurred while reading or writing options file.
    Io(std::io::Error),
    /// Options text is not valid RON or does not match the options layout.
    Deserialize(ron::error::SpannedError),
    /// Options could not be written as RON.
    Serialize(ron::Error),
}

impl Error for PhysicsError {}

impl Display for PhysicsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAPhysicsObject(handle) => {
                write!(f, "node {handle:?} is not a physics object")
            }
            Self::ForeignBody(id) => write!(
                f,
                "physics object {id} already has a body that belongs to another world"
            ),
            Self::DuplicateId(id) => write!(
                f,
                "another physics object with id {id} is already registered in the world"
            ),
            Self::ContainerRemoved => {
                write!(f, "container node of the physics world was removed from the graph")
            }
            Self::DegenerateShape { object, fixture } => write!(
                f,
                "fixture {fixture} of physics object {object:?} has degenerate shape"
            ),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Deserialize(err) => write!(f, "unable to parse world options: {err}"),
            Self::Serialize(err) => write!(f, "unable to write world options: {err}"),
        }
    }
}

impl From<std::io::Error> for PhysicsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ron::error::SpannedError> for PhysicsError {
    fn from(e: ron::error::SpannedError) -> Self {
        Self::Deserialize(e)
    }
}

impl From<ron::Error> for PhysicsError {
    fn from(e: ron::Error) -> Self {
        Self::Serialize(e)
    }
}
