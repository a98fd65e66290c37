//! Input abstraction and movement.
//!
//! ## Pipeline
//!
//! 1. The host translates raw key events into [`KeyEvent`]s over logical
//!    [`InputAction`]s (arrows / WASD, Space, Escape).
//! 2. [`RoverIntent::apply`] records which movement directions are held.
//! 3. [`move_rover`] converts the held directions into a velocity at the
//!    rover's current effective speed and moves it, clamped to the canvas.
//!
//! The most recent intent is in effect for the whole next tick; there is no
//! sub-tick interpolation.  Tests drive the rover by writing `RoverIntent`
//! directly.

use super::state::Rover;
use bevy::math::Vec2;

/// Logical game actions a key can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ActivateShield,
    TogglePause,
}

/// A discrete key transition over a logical action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(InputAction),
    Up(InputAction),
}

/// Held movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoverIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl RoverIntent {
    /// Record a movement key transition.  Non-movement actions are ignored here;
    /// the session handles them.
    pub fn apply(&mut self, event: KeyEvent) {
        let (action, held) = match event {
            KeyEvent::Down(action) => (action, true),
            KeyEvent::Up(action) => (action, false),
        };
        match action {
            InputAction::MoveUp => self.up = held,
            InputAction::MoveDown => self.down = held,
            InputAction::MoveLeft => self.left = held,
            InputAction::MoveRight => self.right = held,
            InputAction::ActivateShield | InputAction::TogglePause => {}
        }
    }

    /// Unit-per-axis direction (-1, 0 or 1 on each axis, canvas +Y down).
    ///
    /// Opposite keys held together cancel out.
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Set the rover's velocity from its intent and effective speed, move it, and
/// keep it fully inside the canvas.
pub fn move_rover(rover: &mut Rover, canvas: Vec2) {
    rover.velocity = rover.intent.direction() * rover.effective_speed();
    rover.pos += rover.velocity;
    let max = (canvas - rover.size).max(Vec2::ZERO);
    rover.pos = rover.pos.clamp(Vec2::ZERO, max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{archetype, ArchetypeId};

    fn test_rover() -> Rover {
        Rover::from_archetype(archetype(ArchetypeId::Atlas), 500.0)
    }

    #[test]
    fn key_down_then_up_clears_direction() {
        let mut intent = RoverIntent::default();
        intent.apply(KeyEvent::Down(InputAction::MoveRight));
        assert_eq!(intent.direction(), Vec2::new(1.0, 0.0));
        intent.apply(KeyEvent::Up(InputAction::MoveRight));
        assert_eq!(intent.direction(), Vec2::ZERO);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut intent = RoverIntent::default();
        intent.apply(KeyEvent::Down(InputAction::MoveUp));
        intent.apply(KeyEvent::Down(InputAction::MoveDown));
        assert_eq!(intent.direction().y, 0.0);
    }

    #[test]
    fn movement_uses_effective_speed() {
        let mut rover = test_rover();
        rover.speed_multiplier = 0.5;
        rover.intent.down = true;
        let start = rover.pos;

        move_rover(&mut rover, Vec2::new(800.0, 500.0));

        let expected = rover.base_speed * 0.5;
        assert!((rover.pos.y - start.y - expected).abs() < 1e-4);
        assert!((rover.velocity.y - expected).abs() < 1e-4);
    }

    #[test]
    fn rover_stays_on_canvas() {
        let mut rover = test_rover();
        rover.pos = Vec2::new(1.0, 1.0);
        rover.intent.left = true;
        rover.intent.up = true;
        for _ in 0..10 {
            move_rover(&mut rover, Vec2::new(800.0, 500.0));
        }
        assert_eq!(rover.pos, Vec2::ZERO);
    }
}
