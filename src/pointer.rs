//! Pointer tracker. Listeners write canvas-local coordinates into this;
//! the session samples it once per tick. An all-zero reading means "no input
//! yet", not a valid position.

use crate::model::Vec2;

#[derive(Debug, Default)]
pub struct PointerState {
    x: f64,
    y: f64,
}

impl PointerState {
    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// `None` until the pointer has engaged.
    pub fn sample(&self) -> Option<Vec2> {
        if self.x == 0.0 && self.y == 0.0 {
            None
        } else {
            Some(Vec2::new(self.x, self.y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_the_not_engaged_sentinel() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.sample(), None);
        pointer.set(120.0, 80.0);
        assert_eq!(pointer.sample(), Some(Vec2::new(120.0, 80.0)));
        // a later exact (0,0) reading reverts to not-engaged
        pointer.set(0.0, 0.0);
        assert_eq!(pointer.sample(), None);
    }

    #[test]
    fn single_zero_axis_is_a_valid_position() {
        let mut pointer = PointerState::default();
        pointer.set(0.0, 45.0);
        assert_eq!(pointer.sample(), Some(Vec2::new(0.0, 45.0)));
    }
}
