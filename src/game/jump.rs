//! Ground / ceiling / jump state machine
//!
//! Two states, read straight off the player's ground flag:
//! - `Grounded`: no vertical integration
//! - `Airborne`: gravity accumulates into vertical velocity every tick
//!
//! Grounded -> Airborne on a fresh jump press, on a failed ground probe
//! (walked off a ledge) or on a drop-through request. Airborne -> Grounded
//! when the resolver refuses a downward move.
//!
//! Holding jump while airborne charges a counter; at the threshold a one-off
//! boost is added (long jump). Releasing the key closes the charge window
//! for that jump.

use super::collision::{MoveResult, SNAP_EPSILON};
use super::player::Player;
use super::settings::PhysicsSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    Airborne,
}

impl JumpPhase {
    pub fn of(player: &Player) -> Self {
        if player.touching_ground {
            JumpPhase::Grounded
        } else {
            JumpPhase::Airborne
        }
    }
}

/// Jump key tracking and long-jump charge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpState {
    /// Airborne ticks the key has been held since the jump started
    charge: u32,
    /// Still inside the current jump's charge window
    charging: bool,
    boost_applied: bool,
    /// Key state on the previous tick, for press detection
    key_was_held: bool,
}

impl JumpState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }

    pub fn boost_applied(&self) -> bool {
        self.boost_applied
    }

    /// Grounded -> Airborne with the short jump velocity
    fn start_jump(&mut self, player: &mut Player, settings: &PhysicsSettings) {
        player.vertical_velocity = settings.short_jump_velocity;
        player.touching_ground = false;
        self.charge = 0;
        self.charging = true;
        self.boost_applied = false;
        log::debug!("jump from ({:.2}, {:.2})", player.position.x, player.position.y);
    }

    /// Start of tick: ground probe, jump start, charge, gravity.
    ///
    /// `supported` is the ground probe result for the current position.
    /// Returns the vertical displacement to request from the resolver.
    pub fn begin_tick(
        &mut self,
        player: &mut Player,
        supported: bool,
        jump_held: bool,
        settings: &PhysicsSettings,
    ) -> f64 {
        let pressed = jump_held && !self.key_was_held;
        self.key_was_held = jump_held;

        if player.touching_ground && !supported {
            player.touching_ground = false;
            self.charging = false;
        }

        if player.touching_ground && pressed {
            self.start_jump(player, settings);
        }

        match JumpPhase::of(player) {
            JumpPhase::Grounded => 0.0,
            JumpPhase::Airborne => {
                if self.charging {
                    if jump_held {
                        self.charge += 1;
                        if self.charge >= settings.long_jump_threshold && !self.boost_applied {
                            player.vertical_velocity += settings.long_jump_boost;
                            self.boost_applied = true;
                            log::debug!("long jump boost after {} ticks", self.charge);
                        }
                    } else {
                        self.charging = false;
                    }
                }

                player.vertical_velocity += settings.gravity;
                settings.velocity_scale * player.vertical_velocity
            }
        }
    }

    /// Drop through the platform at `platform_row` (only from the ground)
    pub fn descend(&mut self, player: &mut Player, platform_row: Option<i32>) -> bool {
        match platform_row {
            Some(row) if player.touching_ground => {
                player.drop_through = Some(row);
                player.touching_ground = false;
                player.vertical_velocity = 0.0;
                self.charging = false;
                true
            }
            _ => false,
        }
    }

    /// End of tick: react to the resolver's ground and ceiling events
    pub fn finish_tick(&mut self, player: &mut Player, result: &MoveResult) {
        if result.landed {
            self.charging = false;
            self.charge = 0;
            if let Some(floor) = result.floor {
                snap_to_floor(player, floor);
            }
        }
        if result.hit_ceiling {
            self.charging = false;
        }
    }
}

/// Lower the player to rest just above `floor`, as long as the feet stay in
/// the cell row they are already in
pub fn snap_to_floor(player: &mut Player, floor: f64) {
    let bottom = player.bounding_box.bottom();
    let target = floor - bottom - SNAP_EPSILON;
    let current_row = (player.position.y + bottom).floor();
    if target > player.position.y && (target + bottom).floor() == current_row {
        player.position.y = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Position;

    fn grounded_player(settings: &PhysicsSettings) -> Player {
        let mut player = Player::new(Position::new(1.5, 1.0), settings);
        player.touching_ground = true;
        player
    }

    #[test]
    fn test_grounded_has_no_vertical_motion() {
        let settings = PhysicsSettings::default();
        let mut player = grounded_player(&settings);
        let mut jump = JumpState::new();

        assert_eq!(jump.begin_tick(&mut player, true, false, &settings), 0.0);
        assert_eq!(JumpPhase::of(&player), JumpPhase::Grounded);
    }

    #[test]
    fn test_short_jump() {
        let settings = PhysicsSettings::default();
        let mut player = grounded_player(&settings);
        let mut jump = JumpState::new();

        let dy = jump.begin_tick(&mut player, true, true, &settings);
        assert_eq!(JumpPhase::of(&player), JumpPhase::Airborne);
        assert_eq!(player.vertical_velocity, -16.0);
        assert!((dy + 0.16).abs() < 1e-9);

        // Released right away: no boost ever
        for _ in 0..20 {
            jump.begin_tick(&mut player, false, false, &settings);
        }
        assert!(!jump.boost_applied());
        assert_eq!(player.vertical_velocity, -16.0 + 20.0);
    }

    #[test]
    fn test_long_jump_boost_applies_once() {
        let settings = PhysicsSettings { long_jump_threshold: 3, ..Default::default() };
        let mut player = grounded_player(&settings);
        let mut jump = JumpState::new();

        // Tick 1: jump starts, charge 1
        jump.begin_tick(&mut player, true, true, &settings);
        jump.begin_tick(&mut player, false, true, &settings);
        assert!(!jump.boost_applied());

        // Tick 3 reaches the threshold
        jump.begin_tick(&mut player, false, true, &settings);
        assert!(jump.boost_applied());
        let expected = -17.0 + 3.0 * 1.0 - 5.9;
        assert!((player.vertical_velocity - expected).abs() < 1e-9);

        // Holding longer adds gravity only
        for _ in 0..5 {
            jump.begin_tick(&mut player, false, true, &settings);
        }
        assert!((player.vertical_velocity - (expected + 5.0)).abs() < 1e-9);
        assert_eq!(jump.charge(), 8);
    }

    #[test]
    fn test_release_closes_charge_window() {
        let settings = PhysicsSettings { long_jump_threshold: 3, ..Default::default() };
        let mut player = grounded_player(&settings);
        let mut jump = JumpState::new();

        jump.begin_tick(&mut player, true, true, &settings);
        jump.begin_tick(&mut player, false, false, &settings);
        // Pressing again mid-air does not resume charging
        for _ in 0..5 {
            jump.begin_tick(&mut player, false, true, &settings);
        }
        assert!(!jump.boost_applied());
        assert_eq!(jump.charge(), 1);
    }

    #[test]
    fn test_held_key_does_not_rejump() {
        let settings = PhysicsSettings::default();
        let mut player = grounded_player(&settings);
        let mut jump = JumpState::new();

        jump.begin_tick(&mut player, true, true, &settings);
        // Land while still holding
        jump.finish_tick(&mut player, &MoveResult { landed: true, ..Default::default() });
        player.touching_ground = true;
        player.vertical_velocity = 0.0;

        assert_eq!(jump.begin_tick(&mut player, true, true, &settings), 0.0);
        assert!(player.touching_ground);

        // Release then press again
        jump.begin_tick(&mut player, true, false, &settings);
        jump.begin_tick(&mut player, true, true, &settings);
        assert!(!player.touching_ground);
    }

    #[test]
    fn test_walking_off_ledge_falls() {
        let settings = PhysicsSettings::default();
        let mut player = grounded_player(&settings);
        let mut jump = JumpState::new();

        let dy = jump.begin_tick(&mut player, false, false, &settings);
        assert_eq!(JumpPhase::of(&player), JumpPhase::Airborne);
        assert_eq!(player.vertical_velocity, 1.0);
        assert!((dy - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_descend_needs_ground_and_platform() {
        let settings = PhysicsSettings::default();
        let mut jump = JumpState::new();

        let mut player = grounded_player(&settings);
        assert!(!jump.descend(&mut player, None));
        assert!(player.touching_ground);

        assert!(jump.descend(&mut player, Some(3)));
        assert_eq!(player.drop_through, Some(3));
        assert!(!player.touching_ground);

        // Already airborne
        assert!(!jump.descend(&mut player, Some(3)));
    }

    #[test]
    fn test_snap_stays_in_row() {
        let settings = PhysicsSettings::default();
        let mut player = Player::new(Position::new(1.5, 1.3), &settings);

        // Feet at 1.8, floor at 2.0: snap down to rest on it
        snap_to_floor(&mut player, 2.0);
        assert!((player.position.y - (1.5 - SNAP_EPSILON)).abs() < 1e-9);

        // Floor two rows down would cross a row: left alone
        let mut player = Player::new(Position::new(1.5, 1.3), &settings);
        snap_to_floor(&mut player, 3.0);
        assert_eq!(player.position.y, 1.3);
    }
}
