//! Boundary walls: four static rectangles framing the viewport, each shifted
//! half a wall-thickness outward so its inner face lies on the edge.

use rapier2d::prelude::RigidBodyHandle;

use crate::config::LeashConfig;
use crate::model::{BodyRole, Vec2, Viewport, WallSide};
use crate::physics::world::PhysicsWorld;

pub struct WallSet {
    pub left: RigidBodyHandle,
    pub top: RigidBodyHandle,
    pub right: RigidBodyHandle,
    pub bottom: RigidBodyHandle,
    thickness: f64,
}

pub fn spawn_walls(world: &mut PhysicsWorld, cfg: &LeashConfig, viewport: Viewport) -> WallSet {
    let t = cfg.wall_thickness;
    let (w, h) = (viewport.width, viewport.height);
    let left = world.insert_wall(
        BodyRole::Wall(WallSide::Left),
        Vec2::new(-t / 2.0, h / 2.0),
        Vec2::new(t / 2.0, h / 2.0),
    );
    let top = world.insert_wall(
        BodyRole::Wall(WallSide::Top),
        Vec2::new(w / 2.0, -t / 2.0),
        Vec2::new(w / 2.0, t / 2.0),
    );
    let right = world.insert_wall(
        BodyRole::Wall(WallSide::Right),
        Vec2::new(w + t / 2.0, h / 2.0),
        Vec2::new(t / 2.0, h / 2.0),
    );
    let bottom = world.insert_wall(
        BodyRole::Wall(WallSide::Bottom),
        Vec2::new(w / 2.0, h + t / 2.0),
        Vec2::new(w / 2.0, t / 2.0),
    );
    WallSet { left, top, right, bottom, thickness: t }
}

impl WallSet {
    /// Track new viewport dimensions. Only the right and bottom walls move;
    /// left and top stay anchored because the viewport origin does not move.
    pub fn resize(&self, world: &mut PhysicsWorld, viewport: Viewport) {
        let t = self.thickness;
        world.set_translation(
            self.right,
            Vec2::new(viewport.width + t / 2.0, viewport.height / 2.0),
        );
        world.set_translation(
            self.bottom,
            Vec2::new(viewport.width / 2.0, viewport.height + t / 2.0),
        );
    }
}
