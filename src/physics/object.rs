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

//! Physics object is a scene node bound to a rigid body. See [`PhysicsObject`] docs for more info.

use crate::{
    core::{
        algebra::{Isometry2, Point2, UnitComplex, Vector2},
        id::IdGenerator,
        log::Log,
        pool::Handle,
    },
    physics::{
        contact::ContactKind,
        to_sim, vector_to_sim,
        world::{PhysicsWorld, WorldId},
        ALL_MASK_BITS,
    },
    scene2d::{
        base::{Base, BaseBuilder},
        graph::Graph,
        node::Node,
    },
};
use rapier2d::{
    dynamics::{RigidBody, RigidBodyHandle, RigidBodyType},
    geometry::{Group, InteractionGroups, SharedShape},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Deref, DerefMut},
};

/// Process-unique identity of a physics object. Never reused, even after the object is destroyed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhysicsId(u64);

impl From<u64> for PhysicsId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PhysicsId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl PhysicsId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Rigid body template. There are exactly two of them, objects pick one at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BodyDef {
    pub body_type: RigidBodyType,
}

impl BodyDef {
    pub const DYNAMIC: BodyDef = BodyDef {
        body_type: RigidBodyType::Dynamic,
    };

    pub const STATIC: BodyDef = BodyDef {
        body_type: RigidBodyType::Fixed,
    };

    pub fn is_static(&self) -> bool {
        self.body_type == RigidBodyType::Fixed
    }
}

/// Category and mask bits of a fixture. Two fixtures collide only if the category of each one
/// intersects the mask of the other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category_bits: u32,
    pub mask_bits: u32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category_bits: ObjectOptions::DEFAULT_CATEGORY_BITS,
            mask_bits: ALL_MASK_BITS,
        }
    }
}

impl CollisionFilter {
    pub(crate) fn interaction_groups(&self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category_bits),
            Group::from_bits_truncate(self.mask_bits),
        )
    }
}

/// Shape of a fixture, in simulation units, relative to the body origin.
#[derive(Clone, Debug, PartialEq)]
pub enum FixtureShape {
    Circle { radius: f32 },
    /// Axis-aligned box centered at the body origin.
    Box { half_extents: Vector2<f32> },
    /// Convex polygon. Its convex hull is used if the vertices describe a concave one.
    Polygon { vertices: Vec<Vector2<f32>> },
    /// Two-sided segment.
    Edge {
        begin: Vector2<f32>,
        end: Vector2<f32>,
    },
}

impl FixtureShape {
    /// Converts the descriptor into a native shape. `None` if the engine cannot build it.
    pub(crate) fn to_native(&self) -> Option<SharedShape> {
        match self {
            FixtureShape::Circle { radius } => Some(SharedShape::ball(*radius)),
            FixtureShape::Box { half_extents } => {
                Some(SharedShape::cuboid(half_extents.x, half_extents.y))
            }
            FixtureShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return None;
                }
                let points = vertices
                    .iter()
                    .map(|v| Point2::from(*v))
                    .collect::<Vec<_>>();
                SharedShape::convex_hull(&points)
            }
            FixtureShape::Edge { begin, end } => Some(SharedShape::segment(
                Point2::from(*begin),
                Point2::from(*end),
            )),
        }
    }
}

/// Everything a world needs to create one collider of an object.
#[derive(Clone, Debug, PartialEq)]
pub struct FixtureDesc {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub filter: CollisionFilter,
    pub is_sensor: bool,
    pub shape: FixtureShape,
    pub(crate) owner: Handle<Node>,
}

impl FixtureDesc {
    pub fn from_options(options: &ObjectOptions, shape: FixtureShape) -> Self {
        Self {
            density: options.density.unwrap_or(ObjectOptions::DEFAULT_DENSITY),
            friction: options.friction.unwrap_or(ObjectOptions::DEFAULT_FRICTION),
            restitution: options
                .restitution
                .unwrap_or(ObjectOptions::DEFAULT_RESTITUTION),
            filter: CollisionFilter {
                category_bits: options
                    .category_bits
                    .unwrap_or(ObjectOptions::DEFAULT_CATEGORY_BITS),
                mask_bits: options.mask_bits.unwrap_or(ALL_MASK_BITS),
            },
            is_sensor: options.is_sensor.unwrap_or_default(),
            shape,
            owner: Handle::NONE,
        }
    }

    /// Scene node that owns the fixture. Set when the object is added to a graph.
    pub fn owner(&self) -> Handle<Node> {
        self.owner
    }
}

/// Construction options of a physics object. Absent fields take the defaults listed in the
/// associated constants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectOptions {
    pub density: Option<f32>,
    pub friction: Option<f32>,
    pub restitution: Option<f32>,
    pub is_static: Option<bool>,
    pub category_bits: Option<u32>,
    pub mask_bits: Option<u32>,
    pub is_sensor: Option<bool>,
}

impl ObjectOptions {
    pub const DEFAULT_DENSITY: f32 = 1.0;
    pub const DEFAULT_FRICTION: f32 = 0.2;
    pub const DEFAULT_RESTITUTION: f32 = 0.0;
    pub const DEFAULT_CATEGORY_BITS: u32 = 0x0001;

    /// Shortcut for options of a static object with default material.
    pub fn fixed() -> Self {
        Self {
            is_static: Some(true),
            ..Default::default()
        }
    }
}

/// Contact callback. Receives the handle of the other side of the contact and the object itself.
pub type ContactHandler = Box<dyn FnMut(Handle<Node>, &PhysicsObject)>;

/// A scene node with physics identity: a body template, fixture descriptors and a handle of the
/// native body once the object is added to a [`PhysicsWorld`].
///
/// # Transform ownership
///
/// The node transform is what gets displayed. The world copies the simulated pose onto it every
/// tick. Moving an object procedurally (teleport) must go through [`Self::set_x`],
/// [`Self::set_y`] and [`Self::set_rotation`], which also push the new value into the body.
///
/// # Contacts
///
/// Each contact kind has an optional handler slot. Contacts of kinds without a handler are queued
/// as [`crate::physics::ContactEvent`]s on the world.
pub struct PhysicsObject {
    base: Base,
    id: PhysicsId,
    body_def: BodyDef,
    fixtures: Vec<FixtureDesc>,
    body: Option<(WorldId, RigidBodyHandle)>,
    mask_bits: u32,
    handlers: [Option<ContactHandler>; 4],
}

impl Debug for PhysicsObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsObject")
            .field("base", &self.base)
            .field("id", &self.id)
            .field("body_def", &self.body_def)
            .field("fixtures", &self.fixtures)
            .field("body", &self.body)
            .field("mask_bits", &self.mask_bits)
            .field(
                "handlers",
                &ContactKind::ALL
                    .iter()
                    .filter(|kind| self.has_contact_handler(**kind))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Deref for PhysicsObject {
    type Target = Base;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for PhysicsObject {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl PhysicsObject {
    pub fn id(&self) -> PhysicsId {
        self.id
    }

    pub fn body_def(&self) -> &BodyDef {
        &self.body_def
    }

    pub fn fixtures(&self) -> &[FixtureDesc] {
        &self.fixtures
    }

    /// Handle of the native body. `None` until the object is added to a world and after its
    /// removal is finalized.
    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body.map(|(_, body)| body)
    }

    /// World that owns the native body, if there is one.
    pub fn world(&self) -> Option<WorldId> {
        self.body.map(|(world, _)| world)
    }

    pub(crate) fn bind_body(&mut self, world: WorldId, body: RigidBodyHandle) {
        self.body = Some((world, body));
    }

    pub(crate) fn take_body(&mut self) -> Option<RigidBodyHandle> {
        self.body.take().map(|(_, body)| body)
    }

    /// Body handle, but only if the body belongs to the given world. Body handles of different
    /// worlds may collide.
    fn body_in(&self, world: &PhysicsWorld) -> Option<RigidBodyHandle> {
        match self.body {
            Some((owner, body)) if owner == world.id() => Some(body),
            Some((owner, _)) => {
                Log::warn(format!(
                    "Physics object {} belongs to world {}, but world {} was given",
                    self.id,
                    owner,
                    world.id()
                ));
                None
            }
            None => None,
        }
    }

    pub(crate) fn bind_owner(&mut self, owner: Handle<Node>) {
        for fixture in self.fixtures.iter_mut() {
            fixture.owner = owner;
        }
    }

    /// Bits of the categories the object collides with.
    pub fn mask_bits(&self) -> u32 {
        self.mask_bits
    }

    fn with_body<R, F>(&self, world: &mut PhysicsWorld, func: F) -> Option<R>
    where
        F: FnOnce(&mut RigidBody) -> R,
    {
        let body = self.body_in(world)?;
        world.body_mut(body).map(func)
    }

    pub fn set_x(&mut self, x: f32, world: &mut PhysicsWorld) {
        self.local_transform_mut().set_x(x);
        self.with_body(world, |body| {
            let mut position = *body.position();
            position.translation.x = to_sim(x);
            body.set_position(position, true);
        });
    }

    pub fn set_y(&mut self, y: f32, world: &mut PhysicsWorld) {
        self.local_transform_mut().set_y(y);
        self.with_body(world, |body| {
            let mut position = *body.position();
            position.translation.y = to_sim(y);
            body.set_position(position, true);
        });
    }

    pub fn set_rotation(&mut self, rotation: f32, world: &mut PhysicsWorld) {
        self.local_transform_mut().set_rotation(rotation);
        self.with_body(world, |body| {
            let mut position = *body.position();
            position.rotation = UnitComplex::new(rotation);
            body.set_position(position, true);
        });
    }

    /// Pushes the current node position and rotation into the body and re-applies the mask bits
    /// to every collider.
    pub fn reflect(&self, world: &mut PhysicsWorld) {
        let position = Isometry2::new(vector_to_sim(self.position()), self.rotation());
        self.with_body(world, |body| body.set_position(position, true));
        self.apply_mask(world);
    }

    fn apply_mask(&self, world: &mut PhysicsWorld) {
        if let Some(body) = self.body_in(world) {
            world.set_collision_mask(body, self.mask_bits);
        }
    }

    pub fn add_mask(&mut self, bits: u32, world: &mut PhysicsWorld) {
        self.mask_bits |= bits;
        self.apply_mask(world);
    }

    pub fn remove_mask(&mut self, bits: u32, world: &mut PhysicsWorld) {
        self.mask_bits &= !bits;
        self.apply_mask(world);
    }

    pub fn add_all_mask(&mut self, world: &mut PhysicsWorld) {
        self.mask_bits = ALL_MASK_BITS;
        self.apply_mask(world);
    }

    pub fn remove_all_mask(&mut self, world: &mut PhysicsWorld) {
        self.mask_bits = 0;
        self.apply_mask(world);
    }

    pub fn to_dynamic(&self, world: &mut PhysicsWorld) {
        self.with_body(world, |body| {
            body.set_body_type(RigidBodyType::Dynamic, true)
        });
    }

    pub fn to_static(&self, world: &mut PhysicsWorld) {
        self.with_body(world, |body| body.set_body_type(RigidBodyType::Fixed, true));
    }

    /// Body type of the native body, if there is one.
    pub fn body_type(&self, world: &PhysicsWorld) -> Option<RigidBodyType> {
        world
            .bodies()
            .get(self.body_in(world)?)
            .map(|body| body.body_type())
    }

    /// Adds a force (in simulation units) to the body. Forces are cleared after every tick.
    pub fn apply_force(&self, force: Vector2<f32>, world: &mut PhysicsWorld) {
        self.with_body(world, |body| body.add_force(force, true));
    }

    /// Applies an impulse (in simulation units) to the body.
    pub fn apply_impulse(&self, impulse: Vector2<f32>, world: &mut PhysicsWorld) {
        self.with_body(world, |body| body.apply_impulse(impulse, true));
    }

    /// Linear velocity of the body in simulation units.
    pub fn linear_velocity(&self, world: &PhysicsWorld) -> Option<Vector2<f32>> {
        world
            .bodies()
            .get(self.body_in(world)?)
            .map(|body| *body.linvel())
    }

    pub fn set_linear_velocity(&self, velocity: Vector2<f32>, world: &mut PhysicsWorld) {
        self.with_body(world, |body| body.set_linvel(velocity, true));
    }

    /// Attaches a handler for the given contact kind, replacing the previous one.
    pub fn set_contact_handler<F>(&mut self, kind: ContactKind, handler: F)
    where
        F: FnMut(Handle<Node>, &PhysicsObject) + 'static,
    {
        self.handlers[kind.index()] = Some(Box::new(handler));
    }

    pub fn with_contact_handler<F>(mut self, kind: ContactKind, handler: F) -> Self
    where
        F: FnMut(Handle<Node>, &PhysicsObject) + 'static,
    {
        self.set_contact_handler(kind, handler);
        self
    }

    pub fn clear_contact_handler(&mut self, kind: ContactKind) {
        self.handlers[kind.index()] = None;
    }

    pub fn has_contact_handler(&self, kind: ContactKind) -> bool {
        self.handlers[kind.index()].is_some()
    }

    pub(crate) fn take_contact_handler(&mut self, kind: ContactKind) -> Option<ContactHandler> {
        self.handlers[kind.index()].take()
    }

    pub(crate) fn restore_contact_handler(&mut self, kind: ContactKind, handler: ContactHandler) {
        // A handler attached while the old one was running wins.
        let slot = &mut self.handlers[kind.index()];
        if slot.is_none() {
            *slot = Some(handler);
        }
    }
}

/// Builds physics objects. Shape builders ([`crate::physics::CircleBuilder`] and others) wrap it,
/// use it directly for objects with custom or multiple fixtures.
pub struct PhysicsObjectBuilder {
    base_builder: BaseBuilder,
    options: ObjectOptions,
}

impl PhysicsObjectBuilder {
    pub fn new(base_builder: BaseBuilder) -> Self {
        Self {
            base_builder,
            options: Default::default(),
        }
    }

    pub fn with_options(mut self, options: ObjectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ObjectOptions {
        &self.options
    }

    /// Creates an object with a single fixture.
    pub fn build_with_shape(
        self,
        shape: FixtureShape,
        ids: &mut IdGenerator<PhysicsId>,
    ) -> PhysicsObject {
        self.build_with_shapes([shape], ids)
    }

    /// Creates an object with one fixture per shape, all sharing the same options.
    pub fn build_with_shapes<I>(self, shapes: I, ids: &mut IdGenerator<PhysicsId>) -> PhysicsObject
    where
        I: IntoIterator<Item = FixtureShape>,
    {
        let options = self.options;
        PhysicsObject {
            base: self.base_builder.build_base(),
            id: ids.next_id(),
            body_def: if options.is_static.unwrap_or_default() {
                BodyDef::STATIC
            } else {
                BodyDef::DYNAMIC
            },
            fixtures: shapes
                .into_iter()
                .map(|shape| FixtureDesc::from_options(&options, shape))
                .collect(),
            body: None,
            mask_bits: options.mask_bits.unwrap_or(ALL_MASK_BITS),
            handlers: Default::default(),
        }
    }

    /// Creates an object with a single fixture and adds it to the graph.
    pub fn build(
        self,
        shape: FixtureShape,
        graph: &mut Graph,
        ids: &mut IdGenerator<PhysicsId>,
    ) -> Handle<Node> {
        graph.add_node(Node::PhysicsObject(self.build_with_shape(shape, ids)))
    }
}

#[cfg(test)]
mod test {
    use crate::{
        core::{algebra::Vector2, id::IdGenerator},
        physics::{
            object::{BodyDef, FixtureShape, ObjectOptions, PhysicsObjectBuilder},
            ContactKind,
        },
        scene2d::{base::BaseBuilder, graph::Graph},
    };

    fn circle() -> FixtureShape {
        FixtureShape::Circle { radius: 1.0 }
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ids = IdGenerator::new();
        let a = PhysicsObjectBuilder::new(BaseBuilder::new()).build_with_shape(circle(), &mut ids);
        let b = PhysicsObjectBuilder::new(BaseBuilder::new()).build_with_shape(circle(), &mut ids);
        assert!(a.id() < b.id());
    }

    #[test]
    fn absent_options_take_defaults() {
        let mut ids = IdGenerator::new();
        let object =
            PhysicsObjectBuilder::new(BaseBuilder::new()).build_with_shape(circle(), &mut ids);

        assert_eq!(object.body_def(), &BodyDef::DYNAMIC);
        assert!(object.body().is_none());
        assert_eq!(object.mask_bits(), 0xFFFF);
        let fixture = &object.fixtures()[0];
        assert_eq!(fixture.density, 1.0);
        assert_eq!(fixture.friction, 0.2);
        assert_eq!(fixture.restitution, 0.0);
        assert_eq!(fixture.filter.category_bits, 0x0001);
        assert_eq!(fixture.filter.mask_bits, 0xFFFF);
        assert!(!fixture.is_sensor);
    }

    #[test]
    fn options_override_defaults() {
        let mut ids = IdGenerator::new();
        let object = PhysicsObjectBuilder::new(BaseBuilder::new())
            .with_options(ObjectOptions {
                density: Some(3.0),
                is_static: Some(true),
                category_bits: Some(0b100),
                mask_bits: Some(0b011),
                is_sensor: Some(true),
                ..Default::default()
            })
            .build_with_shape(circle(), &mut ids);

        assert!(object.body_def().is_static());
        assert_eq!(object.mask_bits(), 0b011);
        let fixture = &object.fixtures()[0];
        assert_eq!(fixture.density, 3.0);
        assert_eq!(fixture.filter.category_bits, 0b100);
        assert!(fixture.is_sensor);
    }

    #[test]
    fn adding_to_graph_binds_fixture_owner() {
        let mut graph = Graph::new();
        let mut ids = IdGenerator::new();
        let handle = PhysicsObjectBuilder::new(BaseBuilder::new()).build(
            FixtureShape::Box {
                half_extents: Vector2::new(1.0, 1.0),
            },
            &mut graph,
            &mut ids,
        );
        let object = graph.physics_object(handle).unwrap();
        assert!(object.fixtures().iter().all(|f| f.owner() == handle));
    }

    #[test]
    fn degenerate_polygon_has_no_native_shape() {
        let shape = FixtureShape::Polygon {
            vertices: vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)],
        };
        assert!(shape.to_native().is_none());

        let shape = FixtureShape::Polygon {
            vertices: vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 1.0),
            ],
        };
        assert!(shape.to_native().is_some());
    }

    #[test]
    fn contact_handler_slots_are_independent() {
        let mut ids = IdGenerator::new();
        let mut object =
            PhysicsObjectBuilder::new(BaseBuilder::new()).build_with_shape(circle(), &mut ids);
        assert!(ContactKind::ALL
            .iter()
            .all(|kind| !object.has_contact_handler(*kind)));

        object.set_contact_handler(ContactKind::End, |_, _| {});
        assert!(object.has_contact_handler(ContactKind::End));
        assert!(!object.has_contact_handler(ContactKind::Begin));

        let handler = object.take_contact_handler(ContactKind::End);
        assert!(handler.is_some());
        assert!(!object.has_contact_handler(ContactKind::End));

        if let Some(handler) = handler {
            object.restore_contact_handler(ContactKind::End, handler);
        }
        assert!(object.has_contact_handler(ContactKind::End));

        object.clear_contact_handler(ContactKind::End);
        assert!(!object.has_contact_handler(ContactKind::End));
    }
}
