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

//! Retained hierarchy of 2D nodes.

use crate::{
    core::{
        math::Rect,
        pool::{Handle, Pool},
    },
    physics::PhysicsObject,
    scene2d::node::Node,
};
use std::ops::{Index, IndexMut};

/// Scene graph. Nodes live in a generational pool, so handles stay valid (and detectably stale)
/// no matter how the hierarchy changes.
#[derive(Debug)]
pub struct Graph {
    pool: Pool<Node>,
    root: Handle<Node>,
    stack: Vec<Handle<Node>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates new graph instance with single root node.
    pub fn new() -> Self {
        let mut pool = Pool::new();
        let mut root = Node::Base(Default::default());
        root.set_name("__ROOT__");
        let root = pool.spawn(root);
        Self {
            pool,
            root,
            stack: Vec::new(),
        }
    }

    /// Adds new node to the graph and attaches it to the root node. Physics objects get their
    /// fixtures bound to the new handle.
    pub fn add_node(&mut self, node: Node) -> Handle<Node> {
        let handle = self.pool.spawn(node);
        if let Node::PhysicsObject(object) = &mut self.pool[handle] {
            object.bind_owner(handle);
        }
        self.link_nodes(handle, self.root);
        handle
    }

    pub fn get_root(&self) -> Handle<Node> {
        self.root
    }

    /// Destroys node and its children recursively.
    ///
    /// # Notes
    ///
    /// A physics world that still tracks one of the destroyed objects notices it on the next
    /// reflect pass and releases the body.
    pub fn remove_node(&mut self, node_handle: Handle<Node>) {
        if !self.pool.is_valid_handle(node_handle) {
            return;
        }

        self.unlink_internal(node_handle);

        self.stack.clear();
        self.stack.push(node_handle);
        while let Some(handle) = self.stack.pop() {
            if let Some(node) = self.pool.free(handle) {
                self.stack.extend_from_slice(node.children());
            }
        }
    }

    fn unlink_internal(&mut self, node_handle: Handle<Node>) {
        let parent_handle = std::mem::replace(&mut self.pool[node_handle].parent, Handle::NONE);

        if let Some(parent) = self.pool.try_borrow_mut(parent_handle) {
            if let Some(i) = parent.children.iter().position(|h| *h == node_handle) {
                parent.children.remove(i);
            }
        }
    }

    /// Links specified child with specified parent. The child is appended to the end of the
    /// parent's children list.
    pub fn link_nodes(&mut self, child: Handle<Node>, parent: Handle<Node>) {
        self.unlink_internal(child);
        self.pool[child].parent = parent;
        self.pool[parent].children.push(child);
    }

    /// Detaches the node from its parent without destroying it. The node stays in the graph
    /// but is no longer part of the hierarchy.
    pub fn detach_node(&mut self, node_handle: Handle<Node>) {
        if self.pool.is_valid_handle(node_handle) {
            self.unlink_internal(node_handle);
        }
    }

    /// Detaches every child of the node and returns them in their current order.
    pub fn take_children(&mut self, parent: Handle<Node>) -> Vec<Handle<Node>> {
        let children = std::mem::take(&mut self.pool[parent].children);
        for &child in children.iter() {
            self.pool[child].parent = Handle::NONE;
        }
        children
    }

    /// Attaches the given nodes to the parent, in the given order.
    pub fn set_children<I>(&mut self, parent: Handle<Node>, children: I)
    where
        I: IntoIterator<Item = Handle<Node>>,
    {
        for child in children {
            self.link_nodes(child, parent);
        }
    }

    /// Bounds of the node's content and all its descendants, in the node's local space (the
    /// node's own transform is not applied).
    pub fn local_bounds(&self, handle: Handle<Node>) -> Option<Rect> {
        let node = self.pool.try_borrow(handle)?;
        let mut bounds = node.content_bounds();
        for &child in node.children() {
            if let Some(child_bounds) = self.bounds_in_parent(child) {
                bounds = Some(match bounds {
                    Some(mut bounds) => {
                        bounds.extend_to_contain(child_bounds);
                        bounds
                    }
                    None => child_bounds,
                });
            }
        }
        bounds
    }

    /// Bounds of the node in its parent's space: [`Self::local_bounds`] transformed by the node's
    /// local transform.
    pub fn bounds_in_parent(&self, handle: Handle<Node>) -> Option<Rect> {
        let node = self.pool.try_borrow(handle)?;
        self.local_bounds(handle)
            .map(|bounds| bounds.transform(&node.local_transform().matrix()))
    }

    pub fn is_valid_handle(&self, handle: Handle<Node>) -> bool {
        self.pool.is_valid_handle(handle)
    }

    pub fn try_get(&self, handle: Handle<Node>) -> Option<&Node> {
        self.pool.try_borrow(handle)
    }

    pub fn try_get_mut(&mut self, handle: Handle<Node>) -> Option<&mut Node> {
        self.pool.try_borrow_mut(handle)
    }

    pub fn physics_object(&self, handle: Handle<Node>) -> Option<&PhysicsObject> {
        self.pool.try_borrow(handle)?.as_physics_object()
    }

    pub fn physics_object_mut(&mut self, handle: Handle<Node>) -> Option<&mut PhysicsObject> {
        self.pool.try_borrow_mut(handle)?.as_physics_object_mut()
    }

    /// Amount of nodes in the graph, root included.
    pub fn node_count(&self) -> usize {
        self.pool.alive_count()
    }

    /// Creates new iterator that iterates over internal collection giving (handle; node) pairs.
    /// It does *not* perform any tree traversal!
    pub fn pair_iter(&self) -> impl Iterator<Item = (Handle<Node>, &Node)> {
        self.pool.pair_iter()
    }
}

impl Index<Handle<Node>> for Graph {
    type Output = Node;

    #[track_caller]
    fn index(&self, index: Handle<Node>) -> &Self::Output {
        &self.pool[index]
    }
}

impl IndexMut<Handle<Node>> for Graph {
    #[track_caller]
    fn index_mut(&mut self, index: Handle<Node>) -> &mut Self::Output {
        &mut self.pool[index]
    }
}

#[cfg(test)]
mod test {
    use crate::{
        core::{algebra::Vector2, math::Rect, pool::Handle},
        scene2d::{
            base::BaseBuilder, graph::Graph, sprite::SpriteBuilder, transform::TransformBuilder,
        },
    };

    #[test]
    fn new_nodes_are_attached_to_root() {
        let mut graph = Graph::new();
        let a = BaseBuilder::new().build(&mut graph);
        assert_eq!(graph[a].parent(), graph.get_root());
        assert_eq!(graph[graph.get_root()].children(), &[a]);
    }

    #[test]
    fn detached_node_stays_alive() {
        let mut graph = Graph::new();
        let parent = BaseBuilder::new().build(&mut graph);
        let child = BaseBuilder::new().build(&mut graph);
        graph.link_nodes(child, parent);

        graph.detach_node(child);

        assert!(graph.is_valid_handle(child));
        assert!(graph[child].parent().is_none());
        assert!(graph[parent].children().is_empty());
    }

    #[test]
    fn remove_node_frees_whole_subtree() {
        let mut graph = Graph::new();
        let parent = BaseBuilder::new().build(&mut graph);
        let child = BaseBuilder::new().build(&mut graph);
        let grandchild = BaseBuilder::new().build(&mut graph);
        graph.link_nodes(child, parent);
        graph.link_nodes(grandchild, child);

        graph.remove_node(parent);

        assert!(!graph.is_valid_handle(parent));
        assert!(!graph.is_valid_handle(child));
        assert!(!graph.is_valid_handle(grandchild));
        assert_eq!(graph.node_count(), 1);
        assert!(graph[graph.get_root()].children().is_empty());
    }

    #[test]
    fn children_can_be_replaced_in_bulk() {
        let mut graph = Graph::new();
        let parent = BaseBuilder::new().build(&mut graph);
        let nodes = (0..3)
            .map(|_| {
                let node = BaseBuilder::new().build(&mut graph);
                graph.link_nodes(node, parent);
                node
            })
            .collect::<Vec<_>>();

        let mut children = graph.take_children(parent);
        assert!(graph[parent].children().is_empty());
        assert!(children.iter().all(|c| graph[*c].parent() == Handle::NONE));

        children.reverse();
        graph.set_children(parent, children);

        assert_eq!(graph[parent].children(), &[nodes[2], nodes[1], nodes[0]]);
        assert!(nodes.iter().all(|c| graph[*c].parent() == parent));
    }

    #[test]
    fn bounds_follow_nested_transforms() {
        let mut graph = Graph::new();
        let group = BaseBuilder::new()
            .with_local_transform(
                TransformBuilder::new()
                    .with_position(Vector2::new(100.0, 100.0))
                    .build(),
            )
            .build(&mut graph);
        let sprite = SpriteBuilder::new(
            BaseBuilder::new().with_local_transform(
                TransformBuilder::new()
                    .with_position(Vector2::new(5.0, 10.0))
                    .with_scale(Vector2::new(2.0, 1.0))
                    .build(),
            ),
        )
        .with_size(Vector2::new(20.0, 8.0))
        .build(&mut graph);
        graph.link_nodes(sprite, group);

        assert_eq!(graph.local_bounds(sprite), Some(Rect::new(0.0, 0.0, 20.0, 8.0)));
        assert_eq!(
            graph.local_bounds(group),
            Some(Rect::new(5.0, 10.0, 40.0, 8.0))
        );
        assert_eq!(
            graph.bounds_in_parent(group),
            Some(Rect::new(105.0, 110.0, 40.0, 8.0))
        );
    }

    #[test]
    fn empty_group_has_no_bounds() {
        let mut graph = Graph::new();
        let group = BaseBuilder::new().build(&mut graph);
        assert_eq!(graph.local_bounds(group), None);
    }
}
