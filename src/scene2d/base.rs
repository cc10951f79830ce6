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

//! Contains the common part of every scene node.

use crate::{
    core::{algebra::Vector2, pool::Handle},
    scene2d::{
        graph::Graph,
        node::Node,
        transform::{Transform, TransformBuilder},
    },
};

/// Transform, visibility flags and hierarchy links shared by all node kinds.
///
/// `visibility` is the user-facing "shown" switch, while `renderable` is a per-frame flag that
/// systems (like perspective culling) use to skip drawing a node without touching user intent.
#[derive(Debug)]
pub struct Base {
    transform: Transform,
    visibility: bool,
    renderable: bool,
    pub(crate) parent: Handle<Node>,
    pub(crate) children: Vec<Handle<Node>>,
    name: String,
}

impl Default for Base {
    fn default() -> Self {
        BaseBuilder::new().build_base()
    }
}

impl Base {
    pub fn set_name<S: AsRef<str>>(&mut self, name: S) {
        self.name = name.as_ref().to_owned();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Handle<Node> {
        self.parent
    }

    pub fn children(&self) -> &[Handle<Node>] {
        &self.children
    }

    pub fn local_transform(&self) -> &Transform {
        &self.transform
    }

    pub fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn position(&self) -> Vector2<f32> {
        self.transform.position()
    }

    pub fn rotation(&self) -> f32 {
        self.transform.rotation()
    }

    pub fn set_visibility(&mut self, visibility: bool) {
        self.visibility = visibility;
    }

    pub fn visibility(&self) -> bool {
        self.visibility
    }

    pub fn set_renderable(&mut self, renderable: bool) {
        self.renderable = renderable;
    }

    pub fn is_renderable(&self) -> bool {
        self.renderable
    }
}

pub struct BaseBuilder {
    transform: Transform,
    name: String,
    visibility: bool,
}

impl Default for BaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseBuilder {
    pub fn new() -> Self {
        Self {
            transform: TransformBuilder::new().build(),
            name: "Base".to_string(),
            visibility: true,
        }
    }

    pub fn with_local_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_name<N: AsRef<str>>(mut self, name: N) -> Self {
        self.name = name.as_ref().to_owned();
        self
    }

    pub fn with_visibility(mut self, visibility: bool) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn build_base(self) -> Base {
        Base {
            transform: self.transform,
            visibility: self.visibility,
            renderable: true,
            parent: Default::default(),
            children: Default::default(),
            name: self.name,
        }
    }

    /// Creates a plain group node and attaches it to the root of the graph.
    pub fn build(self, graph: &mut Graph) -> Handle<Node> {
        graph.add_node(Node::Base(self.build_base()))
    }
}
