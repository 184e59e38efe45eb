//! Body chain factory: the pointer-slaved handle, the heavy trailing
//! collider, and the link between them.

use rapier2d::prelude::RigidBodyHandle;

use crate::config::LeashConfig;
use crate::model::{BodyRole, Vec2};
use crate::physics::world::PhysicsWorld;

pub struct Chain {
    pub handle: RigidBodyHandle,
    pub collider: RigidBodyHandle,
}

/// Spawn both bodies at `center` and join them. Geometry comes entirely from
/// the config preset, so identical inputs always produce an identical chain.
pub fn spawn_chain(world: &mut PhysicsWorld, cfg: &LeashConfig, center: Vec2) -> Chain {
    let handle = world.insert_ball(
        BodyRole::Handle,
        center,
        cfg.handle.radius,
        cfg.handle.mass,
        cfg.handle.linear_damping,
        true,
    );
    let collider = world.insert_ball(
        BodyRole::Collider,
        center,
        cfg.collider.radius,
        cfg.collider.mass,
        cfg.collider.linear_damping,
        false,
    );
    // stiffness 1 is a rod, not a spring
    if cfg.chain.stiffness >= 1.0 {
        world.join_rope(handle, collider, cfg.chain.rest_length);
    } else {
        world.join_spring(
            handle,
            collider,
            cfg.chain.rest_length,
            cfg.chain.stiffness,
            cfg.chain.damping,
        );
    }
    Chain { handle, collider }
}
