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

//! Physics world steps the simulation and keeps scene nodes in sync with it. See [`PhysicsWorld`]
//! docs for more info.

use crate::{
    core::{
        algebra::{Isometry2, Vector2},
        instant,
        log::Log,
        parking_lot::Mutex,
        pool::Handle,
    },
    error::PhysicsError,
    physics::{
        config::WorldOptions,
        contact::{ContactCollector, ContactEvent, ContactKind, ContactListeners},
        debug::DebugDrawingContext,
        object::PhysicsId,
        projection::{depth_order, Projected, Projection},
        vector_to_sim,
    },
    scene2d::{base::BaseBuilder, graph::Graph, node::Node},
};
use fxhash::FxHashMap;
use rapier2d::{
    dynamics::{
        CCDSolver, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
        RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
    },
    geometry::{BroadPhase, ColliderBuilder, ColliderHandle, ColliderSet, Group, NarrowPhase},
    pipeline::{DebugRenderPipeline, PhysicsPipeline},
};
use std::{
    fmt::{Debug, Display, Formatter},
    num::NonZeroUsize,
    sync::atomic::{self, AtomicU64},
    time::Duration,
};

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`PhysicsWorld`]. Bodies are bound to the world that created
/// them, handles of different worlds are not interchangeable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorldId(u64);

impl WorldId {
    fn next() -> Self {
        Self(NEXT_WORLD_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

impl Display for WorldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Performance statistics of the physics world. Times are accumulated on every update, call
/// [`Self::reset`] to start over.
#[derive(Debug, Default, Clone)]
pub struct PhysicsPerformanceStatistics {
    /// A time that was needed to perform simulation steps.
    pub step_time: Duration,

    /// A time that was needed to copy simulated poses onto scene nodes.
    pub reflect_time: Duration,
}

impl Display for PhysicsPerformanceStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Physics Step Time: {:?}\nPhysics Reflect Time: {:?}",
            self.step_time, self.reflect_time,
        )
    }
}

impl PhysicsPerformanceStatistics {
    /// Resets performance statistics to default values.
    pub fn reset(&mut self) {
        *self = Default::default();
    }
}

#[derive(Copy, Clone, Debug)]
struct Target {
    node: Handle<Node>,
    body: RigidBodyHandle,
}

/// Physics world owns the simulation and every native body created through it.
///
/// # Lifecycle of objects
///
/// [`Self::add_physics_object`] creates a native body for an object, attaches the object to the
/// world's container node and starts reflecting it. [`Self::remove_physics_object`] detaches the
/// object immediately, but its body is destroyed only at the next [`Self::update`], right after
/// the simulation step. Adding the object back before that cancels the removal.
///
/// # Update
///
/// Every update runs the following phases in order: simulation step, contact dispatch, force
/// clearing, finalization of pending removals and reflection of simulated poses onto nodes.
/// Removed objects are never reflected.
pub struct PhysicsWorld {
    id: WorldId,
    enabled: bool,
    speed: f32,
    gravity: Vector2<f32>,
    allow_sleep: bool,
    reference_fps: f32,
    velocity_iterations: usize,
    position_iterations: usize,
    projection: Projection,

    /// Performance statistics of the updates.
    pub performance_statistics: PhysicsPerformanceStatistics,

    container: Handle<Node>,
    targets: FxHashMap<PhysicsId, Target>,
    deletes: FxHashMap<PhysicsId, Handle<Node>>,
    contact_events: Vec<ContactEvent>,

    // Current physics pipeline.
    pipeline: PhysicsPipeline,
    // Broad phase performs rough intersection checks.
    broad_phase: BroadPhase,
    // Narrow phase is responsible for precise contact generation.
    narrow_phase: NarrowPhase,
    // A continuous collision detection solver.
    ccd_solver: CCDSolver,
    // Structure responsible for maintaining the set of active rigid-bodies, and putting non-moving
    // rigid-bodies to sleep to save computation times.
    islands: IslandManager,
    // A container of rigid bodies.
    bodies: RigidBodySet,
    // A container of colliders.
    colliders: ColliderSet,
    joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    // Collects contacts while the pipeline steps.
    contact_collector: ContactCollector,
    debug_render_pipeline: Mutex<DebugRenderPipeline>,
}

impl Debug for PhysicsWorld {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PhysicsWorld")
    }
}

impl PhysicsWorld {
    /// Creates a new world and its container node under the root of the graph.
    pub fn new(options: &WorldOptions, graph: &mut Graph) -> Self {
        let container = BaseBuilder::new().with_name("PhysicsWorld").build(graph);

        Self {
            id: WorldId::next(),
            enabled: true,
            speed: options.speed,
            gravity: options.gravity,
            allow_sleep: options.allow_sleep,
            reference_fps: options.reference_fps,
            velocity_iterations: options.velocity_iterations,
            position_iterations: options.position_iterations,
            projection: options.projection(),
            performance_statistics: Default::default(),
            container,
            targets: Default::default(),
            deletes: Default::default(),
            contact_events: Default::default(),
            pipeline: PhysicsPipeline::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            islands: IslandManager::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            contact_collector: ContactCollector::new(options.listeners()),
            debug_render_pipeline: Default::default(),
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Node that holds every object added to the world. In perspective mode its children are
    /// re-sorted by depth on every reflect.
    pub fn container(&self) -> Handle<Node> {
        self.container
    }

    /// Registers the object in the world. A native body is created if the object has none yet,
    /// its pose is taken from the node transform. Cancels pending removal of the object.
    pub fn add_physics_object(
        &mut self,
        graph: &mut Graph,
        handle: Handle<Node>,
    ) -> Result<(), PhysicsError> {
        let object = graph
            .physics_object(handle)
            .ok_or(PhysicsError::NotAPhysicsObject(handle))?;
        let id = object.id();
        let registered_node = self.targets.get(&id).map(|target| target.node);

        if !graph.is_valid_handle(self.container) {
            return Err(PhysicsError::ContainerRemoved);
        }

        if let Some(world) = object.world() {
            if world != self.id || registered_node != Some(handle) {
                return Err(PhysicsError::ForeignBody(id));
            }
        } else if registered_node.is_some() {
            // Ids are only unique per generator, objects of different generators may clash.
            return Err(PhysicsError::DuplicateId(id));
        } else {
            // Every shape is converted upfront, so a failure leaves no half-built body behind.
            let shapes = object
                .fixtures()
                .iter()
                .enumerate()
                .map(|(fixture, desc)| {
                    desc.shape.to_native().ok_or(PhysicsError::DegenerateShape {
                        object: handle,
                        fixture,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let listeners = self.contact_collector.listeners();
            let body = RigidBodyBuilder::new(object.body_def().body_type)
                .position(Isometry2::new(
                    vector_to_sim(object.position()),
                    object.rotation(),
                ))
                .can_sleep(self.allow_sleep)
                .user_data(handle.encode_to_u128())
                .build();
            let body_handle = self.bodies.insert(body);

            for (desc, shape) in object.fixtures().iter().zip(shapes) {
                let collider = ColliderBuilder::new(shape)
                    .density(desc.density)
                    .friction(desc.friction)
                    .restitution(desc.restitution)
                    .sensor(desc.is_sensor)
                    .collision_groups(desc.filter.interaction_groups())
                    .active_events(listeners.active_events())
                    .active_hooks(listeners.active_hooks())
                    .contact_force_event_threshold(0.0)
                    .user_data(desc.owner().encode_to_u128())
                    .build();
                self.colliders
                    .insert_with_parent(collider, body_handle, &mut self.bodies);
            }

            Log::info(format!(
                "Native rigid body was created for physics object {} ({})",
                id,
                object.name()
            ));

            self.targets.insert(
                id,
                Target {
                    node: handle,
                    body: body_handle,
                },
            );

            if let Some(object) = graph.physics_object_mut(handle) {
                object.bind_body(self.id, body_handle);
            }
        }

        if let Some(object) = graph.physics_object(handle) {
            object.reflect(self);
        }
        self.deletes.remove(&id);
        graph.link_nodes(handle, self.container);

        Ok(())
    }

    /// Detaches the object from the scene and schedules destruction of its body for the next
    /// update. Does nothing if the object is not registered in the world.
    pub fn remove_physics_object(&mut self, graph: &mut Graph, handle: Handle<Node>) {
        let Some(object) = graph.physics_object(handle) else {
            return;
        };
        let id = object.id();
        if self.targets.get(&id).map(|target| target.node) != Some(handle) {
            return;
        }

        graph.detach_node(handle);
        self.deletes.insert(id, handle);
    }

    /// Advances the world. `delta` is the elapsed time in frames of the reference frame rate,
    /// so `delta == 1.0` means `1 / reference_fps` seconds (times speed) of simulated time.
    pub fn update(&mut self, graph: &mut Graph, delta: f32) {
        if !self.enabled {
            return;
        }

        let time = instant::Instant::now();

        let dt = delta * self.speed / self.reference_fps;
        if dt > 0.0 {
            self.step(dt);
        }

        self.performance_statistics.step_time += instant::Instant::now() - time;

        self.dispatch_contacts(graph);
        self.clear_forces();
        self.finalize_removals(graph);
        self.reflect(graph);
    }

    fn step(&mut self, dt: f32) {
        let integration_parameters = IntegrationParameters {
            dt,
            num_solver_iterations: NonZeroUsize::new(self.velocity_iterations)
                .unwrap_or(NonZeroUsize::MIN),
            num_internal_pgs_iterations: self.position_iterations,
            ..Default::default()
        };

        self.pipeline.step(
            &self.gravity,
            &integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &self.contact_collector,
            &self.contact_collector,
        );
    }

    fn collider_owner(&self, collider: ColliderHandle) -> Option<Handle<Node>> {
        self.colliders
            .get(collider)
            .map(|collider| Handle::decode_from_u128(collider.user_data))
            .filter(|owner| owner.is_some())
    }

    fn dispatch_contacts(&mut self, graph: &mut Graph) {
        for contact in self.contact_collector.drain() {
            let (Some(a), Some(b)) = (
                self.collider_owner(contact.collider1),
                self.collider_owner(contact.collider2),
            ) else {
                continue;
            };

            self.notify(graph, contact.kind, a, b);
            self.notify(graph, contact.kind, b, a);
        }
    }

    fn notify(
        &mut self,
        graph: &mut Graph,
        kind: ContactKind,
        this: Handle<Node>,
        opponent: Handle<Node>,
    ) {
        let handler = match graph.physics_object_mut(this) {
            Some(object) => object.take_contact_handler(kind),
            None => return,
        };

        let Some(mut handler) = handler else {
            self.contact_events.push(ContactEvent {
                kind,
                this,
                opponent,
            });
            return;
        };

        match graph.physics_object(opponent) {
            Some(opponent_object) => handler(opponent, opponent_object),
            // The opponent node is already destroyed, there is nothing to pass to the handler.
            None => self.contact_events.push(ContactEvent {
                kind,
                this,
                opponent,
            }),
        }
        if let Some(object) = graph.physics_object_mut(this) {
            object.restore_contact_handler(kind, handler);
        }
    }

    /// Returns contact events of objects that have no handler for them, in the order they
    /// happened. The queue is emptied.
    pub fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.contact_events)
    }

    fn clear_forces(&mut self) {
        for target in self.targets.values() {
            if let Some(body) = self.bodies.get_mut(target.body) {
                body.reset_forces(false);
                body.reset_torques(false);
            }
        }
    }

    fn finalize_removals(&mut self, graph: &mut Graph) {
        for (id, node) in std::mem::take(&mut self.deletes) {
            let Some(target) = self.targets.remove(&id) else {
                continue;
            };

            let body = graph
                .physics_object_mut(node)
                .and_then(|object| object.take_body())
                .unwrap_or(target.body);
            self.end_contacts_of(graph, body);
            self.remove_body(body);

            Log::info(format!(
                "Native rigid body of physics object {} was destroyed",
                id
            ));
        }
    }

    /// Reports the end of every contact of the body. The engine reports contacts of removed
    /// colliders only after they are gone, when their owners can no longer be resolved.
    fn end_contacts_of(&mut self, graph: &mut Graph, body: RigidBodyHandle) {
        if !self
            .contact_collector
            .listeners()
            .contains(ContactListeners::END_CONTACT)
        {
            return;
        }

        let Some(body) = self.bodies.get(body) else {
            return;
        };

        let mut pairs = Vec::new();
        for &collider in body.colliders() {
            pairs.extend(
                self.narrow_phase
                    .contact_pairs_with(collider)
                    .filter(|pair| pair.has_any_active_contact)
                    .map(|pair| (pair.collider1, pair.collider2)),
            );
            pairs.extend(
                self.narrow_phase
                    .intersection_pairs_with(collider)
                    .filter(|(_, _, intersecting)| *intersecting)
                    .map(|(collider1, collider2, _)| (collider1, collider2)),
            );
        }

        for (collider1, collider2) in pairs {
            let (Some(a), Some(b)) = (
                self.collider_owner(collider1),
                self.collider_owner(collider2),
            ) else {
                continue;
            };

            self.notify(graph, ContactKind::End, a, b);
            self.notify(graph, ContactKind::End, b, a);
        }
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Copies simulated poses of every registered object onto its node, applying the display
    /// projection. Objects pending removal are skipped.
    pub fn reflect(&mut self, graph: &mut Graph) {
        let time = instant::Instant::now();

        let mut stale = Vec::new();
        for (id, target) in self.targets.iter() {
            if self.deletes.contains_key(id) {
                continue;
            }

            let Some(body) = self.bodies.get(target.body) else {
                continue;
            };

            let Some(object) = graph.physics_object_mut(target.node) else {
                stale.push((*id, target.node));
                continue;
            };

            match self
                .projection
                .project(*body.translation(), body.rotation().angle())
            {
                Projected::Flat { position, rotation } => {
                    object
                        .local_transform_mut()
                        .set_position(position)
                        .set_rotation(rotation);
                }
                Projected::Perspective {
                    position,
                    scale,
                    rotation,
                } => {
                    object
                        .local_transform_mut()
                        .set_position(position)
                        .set_rotation(rotation)
                        .set_uniform_scale(scale);
                    object.set_renderable(true);
                    object.set_visibility(true);
                }
                Projected::Culled => object.set_renderable(false),
            }
        }

        for (id, node) in stale {
            Log::warn(format!(
                "Node {:?} of physics object {} was destroyed without removing it from the \
                physics world. Its body will be destroyed on next update.",
                node, id
            ));
            self.deletes.insert(id, node);
        }

        if self.projection.is_perspective() {
            self.depth_sort(graph);
        }

        self.performance_statistics.reflect_time += instant::Instant::now() - time;
    }

    fn depth_sort(&self, graph: &mut Graph) {
        if !graph.is_valid_handle(self.container) {
            return;
        }

        let mut children = graph.take_children(self.container);
        // Stable sort, equal depths keep their previous order.
        children.sort_by(|a, b| depth_order(&graph[*a].position(), &graph[*b].position()));
        graph.set_children(self.container, children);
    }

    /// Draws bodies and colliders of the world. Very useful for debugging.
    pub fn draw(&self, context: &mut DebugDrawingContext) {
        context.offset = self.projection.offset;
        self.debug_render_pipeline.lock().render(
            context,
            &self.bodies,
            &self.colliders,
            &self.joints,
            &self.multibody_joints,
            &self.narrow_phase,
        );
    }

    /// Whether the object is registered in the world (pending removal included).
    pub fn is_registered(&self, id: PhysicsId) -> bool {
        self.targets.contains_key(&id)
    }

    /// Whether the object was removed and waits for the next update to lose its body.
    pub fn is_pending_removal(&self, id: PhysicsId) -> bool {
        self.deletes.contains_key(&id)
    }

    /// Amount of registered objects (pending removal included).
    pub fn object_count(&self) -> usize {
        self.targets.len()
    }

    pub(crate) fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Overwrites collision mask of every collider of the body.
    pub(crate) fn set_collision_mask(&mut self, body: RigidBodyHandle, mask: u32) {
        let Some(body) = self.bodies.get(body) else {
            return;
        };

        for collider in body.colliders() {
            if let Some(collider) = self.colliders.get_mut(*collider) {
                let mut groups = collider.collision_groups();
                groups.filter = Group::from_bits_truncate(mask);
                collider.set_collision_groups(groups);
            }
        }
    }

    /// Native bodies of the world.
    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    /// Native colliders of the world.
    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_gravity(&mut self, gravity: Vector2<f32>) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vector2<f32> {
        self.gravity
    }

    pub fn set_display_offset(&mut self, offset: Vector2<f32>) {
        self.projection.offset = offset;
    }

    pub fn display_offset(&self) -> Vector2<f32> {
        self.projection.offset
    }

    pub fn set_display_angle(&mut self, angle: f32) {
        self.projection.display_angle = angle;
    }

    pub fn display_angle(&self) -> f32 {
        self.projection.display_angle
    }

    pub fn set_perspective_ratio(&mut self, ratio: f32) {
        self.projection.perspective_ratio = ratio;
    }

    pub fn perspective_ratio(&self) -> f32 {
        self.projection.perspective_ratio
    }

    pub fn set_display_negative(&mut self, display_negative: bool) {
        self.projection.display_negative = display_negative;
    }

    pub fn is_display_negative(&self) -> bool {
        self.projection.display_negative
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}
