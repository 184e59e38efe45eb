//! Core data model for the leash controller: body roles, plane geometry and
//! the per-step contact record consumed by the gesture translator.

/// Which horizontal side of the handle the collider occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Identifies a body in collision handling. Resolved once at creation and
/// carried in rapier `user_data`, so events map back to roles without any
/// handle bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyRole {
    Handle,
    Collider,
    Wall(WallSide),
}

impl BodyRole {
    pub fn to_user_data(self) -> u128 {
        match self {
            BodyRole::Handle => 1,
            BodyRole::Collider => 2,
            BodyRole::Wall(WallSide::Left) => 3,
            BodyRole::Wall(WallSide::Right) => 4,
            BodyRole::Wall(WallSide::Top) => 5,
            BodyRole::Wall(WallSide::Bottom) => 6,
        }
    }

    pub fn from_user_data(raw: u128) -> Option<BodyRole> {
        match raw {
            1 => Some(BodyRole::Handle),
            2 => Some(BodyRole::Collider),
            3 => Some(BodyRole::Wall(WallSide::Left)),
            4 => Some(BodyRole::Wall(WallSide::Right)),
            5 => Some(BodyRole::Wall(WallSide::Top)),
            6 => Some(BodyRole::Wall(WallSide::Bottom)),
            _ => None,
        }
    }

    pub fn wall_side(self) -> Option<WallSide> {
        match self {
            BodyRole::Wall(side) => Some(side),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn distance(self, other: Vec2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Canvas-pixel dimensions of the hosting view, threaded explicitly into
/// every geometry-producing function instead of read ad hoc from the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// One collision pair newly in contact during a physics step. `depth` is the
/// penetration depth in pixels at the moment the contact started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub a: BodyRole,
    pub b: BodyRole,
    pub depth: f64,
}

impl Contact {
    pub fn involves_collider(&self) -> bool {
        self.a == BodyRole::Collider || self.b == BodyRole::Collider
    }
}

/// Body positions and radii sampled for drawing; purely observational.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSnapshot {
    pub handle: Vec2,
    pub handle_radius: f64,
    pub collider: Vec2,
    pub collider_radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_user_data_is_stable() {
        let roles = [
            BodyRole::Handle,
            BodyRole::Collider,
            BodyRole::Wall(WallSide::Left),
            BodyRole::Wall(WallSide::Right),
            BodyRole::Wall(WallSide::Top),
            BodyRole::Wall(WallSide::Bottom),
        ];
        for role in roles {
            assert_eq!(BodyRole::from_user_data(role.to_user_data()), Some(role));
        }
        assert_eq!(BodyRole::from_user_data(0), None);
        assert_eq!(BodyRole::from_user_data(99), None);
    }

    #[test]
    fn contact_collider_check_matches_either_slot() {
        let wall = BodyRole::Wall(WallSide::Left);
        let c1 = Contact { a: BodyRole::Collider, b: wall, depth: 2.0 };
        let c2 = Contact { a: wall, b: BodyRole::Collider, depth: 2.0 };
        let c3 = Contact { a: BodyRole::Handle, b: wall, depth: 2.0 };
        assert!(c1.involves_collider());
        assert!(c2.involves_collider());
        assert!(!c3.involves_collider());
    }
}
