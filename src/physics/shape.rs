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

//! Shape builders. Each one creates a physics object with a single fixture of specific shape.
//! Sizes are given in display units and converted to simulation units.
//!
//! [`CircleBuilder::wrap`] and [`RectangleBuilder::wrap`] build an object around existing content:
//! the shape encloses the content bounds, and the content is re-centered on the object origin
//! (which is the body origin) through an intermediate group node.

use crate::{
    core::{algebra::Vector2, id::IdGenerator, math::Rect, pool::Handle},
    physics::{
        object::{FixtureShape, PhysicsId, PhysicsObject, PhysicsObjectBuilder},
        to_sim, vector_to_sim,
    },
    scene2d::{base::BaseBuilder, graph::Graph, node::Node, transform::TransformBuilder},
};

/// Moves `content` into a new group under `object` and offsets the group so that the content
/// bounds are centered on the object origin.
fn center_content(
    object: Handle<Node>,
    content: Handle<Node>,
    bounds: Rect,
    graph: &mut Graph,
) -> Handle<Node> {
    let group = BaseBuilder::new()
        .with_name("Content")
        .with_local_transform(
            TransformBuilder::new()
                .with_position(-bounds.position - bounds.size.scale(0.5))
                .build(),
        )
        .build(graph);
    graph.link_nodes(group, object);
    graph.link_nodes(content, group);
    group
}

/// Bounds of the content in the space it is placed in, zero-sized if it has no content.
fn measure(content: Handle<Node>, graph: &Graph) -> Rect {
    graph
        .bounds_in_parent(content)
        .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0))
}

pub struct CircleBuilder {
    object_builder: PhysicsObjectBuilder,
    radius: f32,
}

impl CircleBuilder {
    pub fn new(object_builder: PhysicsObjectBuilder, radius: f32) -> Self {
        Self {
            object_builder,
            radius,
        }
    }

    pub fn build_object(self, ids: &mut IdGenerator<PhysicsId>) -> PhysicsObject {
        self.object_builder.build_with_shape(
            FixtureShape::Circle {
                radius: to_sim(self.radius),
            },
            ids,
        )
    }

    pub fn build(self, graph: &mut Graph, ids: &mut IdGenerator<PhysicsId>) -> Handle<Node> {
        graph.add_node(Node::PhysicsObject(self.build_object(ids)))
    }

    /// Creates a circle that encloses the content. The radius is the largest half-extent of the
    /// content bounds.
    pub fn wrap(
        object_builder: PhysicsObjectBuilder,
        content: Handle<Node>,
        graph: &mut Graph,
        ids: &mut IdGenerator<PhysicsId>,
    ) -> Handle<Node> {
        let bounds = measure(content, graph);
        let object = Self::new(object_builder, (bounds.w() * 0.5).max(bounds.h() * 0.5))
            .build(graph, ids);
        center_content(object, content, bounds, graph);
        object
    }
}

/// Builds boxes centered at the object origin.
pub struct RectangleBuilder {
    object_builder: PhysicsObjectBuilder,
    size: Vector2<f32>,
}

impl RectangleBuilder {
    pub fn new(object_builder: PhysicsObjectBuilder, width: f32, height: f32) -> Self {
        Self {
            object_builder,
            size: Vector2::new(width, height),
        }
    }

    pub fn build_object(self, ids: &mut IdGenerator<PhysicsId>) -> PhysicsObject {
        self.object_builder.build_with_shape(
            FixtureShape::Box {
                half_extents: vector_to_sim(self.size.scale(0.5)),
            },
            ids,
        )
    }

    pub fn build(self, graph: &mut Graph, ids: &mut IdGenerator<PhysicsId>) -> Handle<Node> {
        graph.add_node(Node::PhysicsObject(self.build_object(ids)))
    }

    /// Creates a box of the same size as the content bounds.
    pub fn wrap(
        object_builder: PhysicsObjectBuilder,
        content: Handle<Node>,
        graph: &mut Graph,
        ids: &mut IdGenerator<PhysicsId>,
    ) -> Handle<Node> {
        let bounds = measure(content, graph);
        let object = Self::new(object_builder, bounds.w(), bounds.h()).build(graph, ids);
        center_content(object, content, bounds, graph);
        object
    }
}

/// Builds convex polygons from vertices given relative to the object origin.
pub struct PolygonBuilder {
    object_builder: PhysicsObjectBuilder,
    vertices: Vec<Vector2<f32>>,
}

impl PolygonBuilder {
    pub fn new(object_builder: PhysicsObjectBuilder, vertices: Vec<Vector2<f32>>) -> Self {
        Self {
            object_builder,
            vertices,
        }
    }

    pub fn build_object(self, ids: &mut IdGenerator<PhysicsId>) -> PhysicsObject {
        self.object_builder.build_with_shape(
            FixtureShape::Polygon {
                vertices: self.vertices.into_iter().map(vector_to_sim).collect(),
            },
            ids,
        )
    }

    pub fn build(self, graph: &mut Graph, ids: &mut IdGenerator<PhysicsId>) -> Handle<Node> {
        graph.add_node(Node::PhysicsObject(self.build_object(ids)))
    }
}

/// Builds a segment from the object origin to the given point.
pub struct EdgeBuilder {
    object_builder: PhysicsObjectBuilder,
    to: Vector2<f32>,
}

impl EdgeBuilder {
    pub fn new(object_builder: PhysicsObjectBuilder, to: Vector2<f32>) -> Self {
        Self { object_builder, to }
    }

    pub fn build_object(self, ids: &mut IdGenerator<PhysicsId>) -> PhysicsObject {
        self.object_builder.build_with_shape(
            FixtureShape::Edge {
                begin: Vector2::new(0.0, 0.0),
                end: vector_to_sim(self.to),
            },
            ids,
        )
    }

    pub fn build(self, graph: &mut Graph, ids: &mut IdGenerator<PhysicsId>) -> Handle<Node> {
        graph.add_node(Node::PhysicsObject(self.build_object(ids)))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        core::{algebra::Vector2, id::IdGenerator, math::Rect},
        physics::{
            object::{FixtureShape, PhysicsObjectBuilder},
            shape::{CircleBuilder, EdgeBuilder, PolygonBuilder, RectangleBuilder},
        },
        scene2d::{
            base::BaseBuilder, graph::Graph, sprite::SpriteBuilder, transform::TransformBuilder,
        },
    };
    use approx::assert_relative_eq;

    fn object_builder() -> PhysicsObjectBuilder {
        PhysicsObjectBuilder::new(BaseBuilder::new())
    }

    #[test]
    fn circle_radius_is_converted() {
        let mut ids = IdGenerator::new();
        let circle = CircleBuilder::new(object_builder(), 15.0).build_object(&mut ids);
        match circle.fixtures()[0].shape {
            FixtureShape::Circle { radius } => assert_relative_eq!(radius, 0.5),
            ref shape => panic!("unexpected shape {:?}", shape),
        }
    }

    #[test]
    fn rectangle_is_centered_box() {
        let mut ids = IdGenerator::new();
        let rect = RectangleBuilder::new(object_builder(), 60.0, 30.0).build_object(&mut ids);
        match rect.fixtures()[0].shape {
            FixtureShape::Box { half_extents } => {
                assert_relative_eq!(half_extents.x, 1.0);
                assert_relative_eq!(half_extents.y, 0.5);
            }
            ref shape => panic!("unexpected shape {:?}", shape),
        }
    }

    #[test]
    fn polygon_and_edge_vertices_are_converted() {
        let mut ids = IdGenerator::new();
        let polygon = PolygonBuilder::new(
            object_builder(),
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(30.0, 0.0),
                Vector2::new(0.0, 60.0),
            ],
        )
        .build_object(&mut ids);
        match &polygon.fixtures()[0].shape {
            FixtureShape::Polygon { vertices } => {
                let expected = [
                    Vector2::new(0.0, 0.0),
                    Vector2::new(1.0, 0.0),
                    Vector2::new(0.0, 2.0),
                ];
                assert_eq!(vertices.len(), expected.len());
                for (v, e) in vertices.iter().zip(expected.iter()) {
                    assert_relative_eq!(v.x, e.x);
                    assert_relative_eq!(v.y, e.y);
                }
            }
            shape => panic!("unexpected shape {:?}", shape),
        }

        let edge = EdgeBuilder::new(object_builder(), Vector2::new(90.0, -30.0))
            .build_object(&mut ids);
        match edge.fixtures()[0].shape {
            FixtureShape::Edge { begin, end } => {
                assert_eq!(begin, Vector2::new(0.0, 0.0));
                assert_relative_eq!(end.x, 3.0);
                assert_relative_eq!(end.y, -1.0);
            }
            ref shape => panic!("unexpected shape {:?}", shape),
        }
    }

    #[test]
    fn wrapped_content_is_centered_on_origin() {
        let mut graph = Graph::new();
        let mut ids = IdGenerator::new();
        let content = SpriteBuilder::new(BaseBuilder::new().with_local_transform(
            TransformBuilder::new()
                .with_position(Vector2::new(7.0, -3.0))
                .build(),
        ))
        .with_size(Vector2::new(40.0, 20.0))
        .build(&mut graph);

        let object = CircleBuilder::wrap(object_builder(), content, &mut graph, &mut ids);

        let bounds = graph.local_bounds(object).unwrap();
        assert_relative_eq!(bounds.center().x, 0.0);
        assert_relative_eq!(bounds.center().y, 0.0);
        assert_eq!(bounds.size, Vector2::new(40.0, 20.0));

        match graph.physics_object(object).unwrap().fixtures()[0].shape {
            FixtureShape::Circle { radius } => assert_relative_eq!(radius, 20.0 / 30.0),
            ref shape => panic!("unexpected shape {:?}", shape),
        }

        // Content keeps its own transform, the intermediate group is what moves.
        let group = graph[content].parent();
        assert_eq!(graph[group].parent(), object);
        assert_eq!(graph[content].position(), Vector2::new(7.0, -3.0));
    }

    #[test]
    fn wrapped_rectangle_matches_content_size() {
        let mut graph = Graph::new();
        let mut ids = IdGenerator::new();
        let content = SpriteBuilder::new(BaseBuilder::new())
            .with_size(Vector2::new(90.0, 30.0))
            .build(&mut graph);

        let object = RectangleBuilder::wrap(object_builder(), content, &mut graph, &mut ids);

        assert_eq!(
            graph.local_bounds(object),
            Some(Rect::new(-45.0, -15.0, 90.0, 30.0))
        );
        match graph.physics_object(object).unwrap().fixtures()[0].shape {
            FixtureShape::Box { half_extents } => {
                assert_relative_eq!(half_extents.x, 1.5);
                assert_relative_eq!(half_extents.y, 0.5);
            }
            ref shape => panic!("unexpected shape {:?}", shape),
        }
    }
}
