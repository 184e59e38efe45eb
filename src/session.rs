//! Simulation driver. Owns the world, the chain, the walls and the gesture
//! state, and exposes the explicit per-tick pipeline the shell drives from a
//! fixed-interval timer: teleport handle, step, translate.

use crate::config::LeashConfig;
use crate::gesture::{self, GestureState, TickContext};
use crate::map::MapPort;
use crate::model::{Contact, SceneSnapshot, Vec2, Viewport};
use crate::physics::chain::{Chain, spawn_chain};
use crate::physics::walls::{WallSet, spawn_walls};
use crate::physics::world::PhysicsWorld;

pub struct LeashSession {
    cfg: LeashConfig,
    viewport: Viewport,
    world: PhysicsWorld,
    chain: Chain,
    walls: WallSet,
    gesture: GestureState,
    // scratch buffer reused across ticks
    contacts: Vec<Contact>,
}

impl LeashSession {
    pub fn new(cfg: LeashConfig, viewport: Viewport) -> Self {
        let mut world = PhysicsWorld::new(cfg.gravity_y, cfg.step_dt());
        let chain = spawn_chain(&mut world, &cfg, viewport.center());
        let walls = spawn_walls(&mut world, &cfg, viewport);
        LeashSession {
            cfg,
            viewport,
            world,
            chain,
            walls,
            gesture: GestureState::default(),
            contacts: Vec::new(),
        }
    }

    /// One logical tick. Physics always steps; the handle only tracks an
    /// engaged pointer; map-affecting logic additionally needs the adapter.
    pub fn tick(&mut self, pointer: Option<Vec2>, map: Option<&mut dyn MapPort>) {
        if let Some(target) = pointer {
            self.world.set_kinematic_target(self.chain.handle, target);
        }

        self.contacts.clear();
        self.world.step_into(&mut self.contacts);

        let (Some(pointer), Some(map)) = (pointer, map) else {
            return;
        };
        let ctx = TickContext {
            handle: self.world.position(self.chain.handle),
            collider: self.world.position(self.chain.collider),
            pointer,
            viewport: self.viewport,
            contacts: &self.contacts,
        };
        gesture::apply(&self.cfg, &mut self.gesture, &ctx, map);
    }

    /// Flush staged pan deltas; driven by the shell on its own interval.
    pub fn flush_pan(&mut self, map: Option<&mut dyn MapPort>) {
        if let Some(map) = map {
            gesture::flush_pan(&mut self.gesture, map);
        }
    }

    /// Track new viewport dimensions. Walls follow the new edges; simulation
    /// velocities and the side classification are left alone.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.walls.resize(&mut self.world, viewport);
        if self.cfg.recenter_on_resize {
            let center = viewport.center();
            self.world.set_translation(self.chain.handle, center);
            self.world.set_translation(self.chain.collider, center);
        }
    }

    pub fn scene(&self) -> SceneSnapshot {
        SceneSnapshot {
            handle: self.world.position(self.chain.handle),
            handle_radius: self.cfg.handle.radius,
            collider: self.world.position(self.chain.collider),
            collider_radius: self.cfg.collider.radius,
        }
    }
}
