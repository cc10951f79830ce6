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

//! Every node kind the 2D scene graph can hold.

use crate::{
    core::math::Rect,
    physics::PhysicsObject,
    scene2d::{base::Base, sprite::Sprite},
};
use std::ops::{Deref, DerefMut};

#[derive(Debug)]
pub enum Node {
    /// Plain group node.
    Base(Base),
    Sprite(Sprite),
    /// Visual node bound to a rigid body.
    PhysicsObject(PhysicsObject),
}

impl Deref for Node {
    type Target = Base;

    fn deref(&self) -> &Self::Target {
        match self {
            Node::Base(base) => base,
            Node::Sprite(sprite) => sprite,
            Node::PhysicsObject(object) => object,
        }
    }
}

impl DerefMut for Node {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Node::Base(base) => base,
            Node::Sprite(sprite) => sprite,
            Node::PhysicsObject(object) => object,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Base(Default::default())
    }
}

impl From<Base> for Node {
    fn from(base: Base) -> Self {
        Node::Base(base)
    }
}

impl From<Sprite> for Node {
    fn from(sprite: Sprite) -> Self {
        Node::Sprite(sprite)
    }
}

impl From<PhysicsObject> for Node {
    fn from(object: PhysicsObject) -> Self {
        Node::PhysicsObject(object)
    }
}

impl Node {
    pub fn as_physics_object(&self) -> Option<&PhysicsObject> {
        match self {
            Node::PhysicsObject(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_physics_object_mut(&mut self) -> Option<&mut PhysicsObject> {
        match self {
            Node::PhysicsObject(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            Node::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Bounds of the node's own content in its local space, children excluded.
    pub fn content_bounds(&self) -> Option<Rect> {
        match self {
            Node::Sprite(sprite) => Some(sprite.content_bounds()),
            Node::Base(_) | Node::PhysicsObject(_) => None,
        }
    }
}
