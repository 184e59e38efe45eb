//! Thin wrapper around the rapier2d boilerplate. The world runs in canvas
//! pixel coordinates (y down), steps with a fixed dt, and reports collision
//! pairs that started during the step together with their penetration depth.

use std::sync::Mutex;

use rapier2d::prelude::*;

use crate::model::{BodyRole, Contact, Vec2};

/// Collects `Started` collision events during a step. Rapier hands events to
/// a `&self` handler, hence the mutex; nothing here runs off the main thread.
#[derive(Default)]
struct CollisionCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle, Real)>>,
}

impl CollisionCollector {
    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle, Real)> {
        std::mem::take(&mut *self.started.lock().unwrap())
    }
}

fn max_penetration(pair: &ContactPair) -> Real {
    let mut depth: Real = 0.0;
    for manifold in &pair.manifolds {
        for point in &manifold.points {
            // dist is negative when the shapes interpenetrate
            depth = depth.max(-point.dist);
        }
    }
    depth
}

impl EventHandler for CollisionCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(h1, h2, _) = event {
            let depth = contact_pair.map(max_penetration).unwrap_or(0.0);
            self.started.lock().unwrap().push((h1, h2, depth));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
        // Not used; the trait requires it.
    }
}

pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    events: CollisionCollector,
}

impl PhysicsWorld {
    /// `gravity_y` is positive-down, in px/s^2, matching canvas coordinates.
    pub fn new(gravity_y: f64, dt: f64) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt as Real;
        // pixel-scale world; keeps solver tolerances sane at ~100 px per meter
        integration_parameters.length_unit = 100.0;
        PhysicsWorld {
            gravity: nalgebra::Vector2::new(0.0, gravity_y as Real),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            events: CollisionCollector::default(),
        }
    }

    /// Insert a circular body. Kinematic bodies follow positions we set on
    /// them (the handle); dynamic ones are fully simulated (the collider).
    pub fn insert_ball(
        &mut self,
        role: BodyRole,
        center: Vec2,
        radius: f64,
        mass: f64,
        linear_damping: f64,
        kinematic: bool,
    ) -> RigidBodyHandle {
        let builder = if kinematic {
            RigidBodyBuilder::kinematic_position_based()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = builder
            .translation(vector![center.x as Real, center.y as Real])
            .linear_damping(linear_damping as Real)
            .user_data(role.to_user_data())
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(radius as Real)
            .mass(mass as Real)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Insert a static rectangular body (half extents, center-based).
    pub fn insert_wall(&mut self, role: BodyRole, center: Vec2, half: Vec2) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x as Real, center.y as Real])
            .user_data(role.to_user_data())
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half.x as Real, half.y as Real)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Rigid link: the distance between the two bodies may not exceed `length`.
    pub fn join_rope(&mut self, a: RigidBodyHandle, b: RigidBodyHandle, length: f64) {
        let joint = RopeJointBuilder::new(length as Real).build();
        self.impulse_joints.insert(a, b, joint, true);
    }

    /// Soft link with a rest length, for sub-unit stiffness configurations.
    pub fn join_spring(
        &mut self,
        a: RigidBodyHandle,
        b: RigidBodyHandle,
        rest_length: f64,
        stiffness: f64,
        damping: f64,
    ) {
        let joint =
            SpringJointBuilder::new(rest_length as Real, stiffness as Real, damping as Real).build();
        self.impulse_joints.insert(a, b, joint, true);
    }

    /// Advance the world one fixed step, appending this step's new contacts.
    pub fn step_into(&mut self, contacts: &mut Vec<Contact>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );

        for (h1, h2, depth) in self.events.drain() {
            let (Some(a), Some(b)) = (self.role_of(h1), self.role_of(h2)) else {
                continue;
            };
            contacts.push(Contact { a, b, depth: f64::from(depth) });
        }
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Vec2 {
        self.bodies
            .get(handle)
            .map(|rb| {
                let t = rb.translation();
                Vec2::new(f64::from(t.x), f64::from(t.y))
            })
            .unwrap_or(Vec2::ZERO)
    }

    /// Hard teleport, used for wall repositioning and chain re-centering.
    pub fn set_translation(&mut self, handle: RigidBodyHandle, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_translation(vector![pos.x as Real, pos.y as Real], true);
        }
    }

    /// Target position a kinematic body reaches over the next step.
    pub fn set_kinematic_target(&mut self, handle: RigidBodyHandle, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_next_kinematic_translation(vector![pos.x as Real, pos.y as Real]);
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn role_of(&self, collider: ColliderHandle) -> Option<BodyRole> {
        let collider = self.colliders.get(collider)?;
        let body = self.bodies.get(collider.parent()?)?;
        BodyRole::from_user_data(body.user_data)
    }
}
