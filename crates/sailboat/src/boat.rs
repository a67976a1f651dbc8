//! Per-boat state machine: `Sailing` until the hull reaches the world edge,
//! then `Sunk` for good.
//!
//! A boat is not carried by the wind like a tracer. Each tick the true wind
//! is moved into the hull frame, combined with the boat's own motion, and
//! moved again into the sail frame. The across-sail component swings the
//! sail until the sheet catches it; only a tight sheet passes the sail force
//! on to the hull.

use std::f64::consts::FRAC_PI_4;

use glam::DVec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use zeilrace_core::prng::Xorshift64;
use zeilrace_core::vector::{is_finite, rotate};
use zeilrace_core::wind::near_edge;
use zeilrace_core::{SimError, WindSource};

use crate::params::SailboatParams;

/// Sheet length given to new boats, as a maximum sail deflection in radians.
pub const DEFAULT_SAIL_ANGLE_BOUND: f64 = FRAC_PI_4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoatState {
    Sailing,
    /// Terminal. The boat keeps its last pose and ignores physics.
    Sunk,
}

/// Inputs an external helmsman may set between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoatControl {
    /// Angular-rate bias. Its effect scales with the square of boat speed.
    pub rudder: f64,
    /// Maximum |sail angle| the sheet allows, in radians.
    pub sail_angle_bound: f64,
}

impl Default for BoatControl {
    fn default() -> Self {
        Self {
            rudder: 0.0,
            sail_angle_bound: DEFAULT_SAIL_ANGLE_BOUND,
        }
    }
}

impl BoatControl {
    /// Validates and builds a control setting.
    ///
    /// The rudder must be finite; the sail angle bound finite and non-negative.
    pub fn new(rudder: f64, sail_angle_bound: f64) -> Result<Self, SimError> {
        if !rudder.is_finite() {
            return Err(SimError::InvalidControl(format!(
                "rudder must be finite, got {rudder}"
            )));
        }
        if !(sail_angle_bound.is_finite() && sail_angle_bound >= 0.0) {
            return Err(SimError::InvalidControl(format!(
                "sail angle bound must be finite and non-negative, got {sail_angle_bound}"
            )));
        }
        Ok(Self {
            rudder,
            sail_angle_bound,
        })
    }
}

/// Sail force in the hull frame for a given sail-frame apparent wind.
///
/// The across-sail component passes straight through, the along-sail one is
/// reversed and scaled by `lift_ratio`, and the result is turned by the
/// effective chord angle `sail_angle * chord_factor`. Zero apparent wind gives
/// zero force at any sail angle.
pub fn sail_force(apparent: DVec2, sail_angle: f64, params: &SailboatParams) -> DVec2 {
    let force = DVec2::new(apparent.x, -params.lift_ratio * apparent.y);
    rotate(force, sail_angle * params.chord_factor)
}

/// A sailboat and its integrator state.
#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    id: u32,
    position: DVec2,
    heading: f64,
    angular_velocity: f64,
    surge: f64,
    sway: f64,
    sail_angle: f64,
    sheet_tight: bool,
    control: BoatControl,
    state: BoatState,
}

impl Boat {
    /// A boat at rest with its sail centred and default controls.
    pub fn new(id: u32, position: DVec2, heading: f64) -> Self {
        Self {
            id,
            position,
            heading,
            angular_velocity: 0.0,
            surge: 0.0,
            sway: 0.0,
            sail_angle: 0.0,
            sheet_tight: false,
            control: BoatControl::default(),
            state: BoatState::Sailing,
        }
    }

    /// Places a boat near `anchor`, offset by up to `jitter` on each axis,
    /// with a uniformly random heading.
    pub fn spawn(id: u32, anchor: DVec2, jitter: f64, rng: &mut Xorshift64) -> Self {
        let dx = rng.next_range(-jitter, jitter);
        let dy = rng.next_range(-jitter, jitter);
        let heading = rng.next_angle();
        Self::new(id, anchor + DVec2::new(dx, dy), heading)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Heading in radians.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Forward body-frame velocity.
    pub fn surge(&self) -> f64 {
        self.surge
    }

    /// Sideways body-frame velocity.
    pub fn sway(&self) -> f64 {
        self.sway
    }

    pub fn sail_angle(&self) -> f64 {
        self.sail_angle
    }

    pub fn sheet_tight(&self) -> bool {
        self.sheet_tight
    }

    pub fn control(&self) -> BoatControl {
        self.control
    }

    pub fn state(&self) -> BoatState {
        self.state
    }

    pub fn is_sunk(&self) -> bool {
        self.state == BoatState::Sunk
    }

    /// Replaces rudder and sheet settings. Has no visible effect once sunk.
    pub fn set_control(&mut self, control: BoatControl) {
        self.control = control;
    }

    /// Moves the boat directly, bypassing physics.
    ///
    /// Body velocities are zeroed so the boat starts from rest at the new
    /// pose. Sunk boats cannot be moved.
    pub fn set_pose(&mut self, position: DVec2, heading: f64) -> Result<(), SimError> {
        if self.is_sunk() {
            return Err(SimError::BoatSunk(self.id));
        }
        if !(is_finite(position) && heading.is_finite()) {
            return Err(SimError::InvalidControl(format!(
                "pose must be finite, got {position:?} heading {heading}"
            )));
        }
        self.position = position;
        self.heading = heading;
        self.surge = 0.0;
        self.sway = 0.0;
        self.angular_velocity = 0.0;
        Ok(())
    }

    /// Advances the boat by one tick in `wind`.
    ///
    /// Sunk boats are left untouched. A boat already within the edge margin
    /// sinks without moving; a boat that ends the tick within the margin
    /// sinks at its new position. A failed wind sample returns the error and
    /// leaves the boat unchanged.
    pub fn update<W>(&mut self, wind: &W, params: &SailboatParams) -> Result<(), SimError>
    where
        W: WindSource + ?Sized,
    {
        if self.is_sunk() {
            return Ok(());
        }
        let extent = wind.extent();
        if near_edge(self.position, extent) {
            self.sink();
            return Ok(());
        }

        let true_wind = wind.velocity(self.position)?;

        // Hull frame: x athwartships, y along the keel.
        let hull_wind = rotate(true_wind, -self.heading) + DVec2::new(self.sway, self.surge);
        // Sail frame: x across the sail, y along it.
        let apparent = rotate(hull_wind, -self.sail_angle);

        let mut sail_angle = self.sail_angle + apparent.length() * apparent.x * params.trim_gain;
        let bound = self.control.sail_angle_bound;
        let sheet_tight = sail_angle.abs() > bound;
        if sheet_tight {
            sail_angle = sail_angle.clamp(-bound, bound);
        }

        let mut sway = self.sway;
        let mut surge = self.surge;
        let mut angular_velocity = self.angular_velocity;
        if sheet_tight {
            let force = sail_force(apparent, sail_angle, params);
            sway += force.x * params.thrust_gain;
            surge += force.y * params.thrust_gain;
            angular_velocity += force.x * params.torque_gain;
        }
        angular_velocity += self.control.rudder * (sway * sway + surge * surge);

        let heading = self.heading + angular_velocity;
        let step = rotate(DVec2::new(sway, surge), heading) + true_wind * params.windage;
        let position = self.position + step;

        if !(is_finite(position) && heading.is_finite()) {
            warn!(
                "boat {} integrated to a non-finite pose, sinking at {:?}",
                self.id, self.position
            );
            self.sink();
            return Ok(());
        }

        self.position = position;
        self.heading = heading;
        self.sail_angle = sail_angle;
        self.sheet_tight = sheet_tight;
        self.sway = sway * params.sway_decay;
        self.surge = surge * params.surge_decay;
        self.angular_velocity = angular_velocity * params.yaw_decay;

        if near_edge(self.position, extent) {
            self.sink();
        }
        Ok(())
    }

    fn sink(&mut self) {
        self.state = BoatState::Sunk;
        info!("boat {} sank at ({:.1}, {:.1})", self.id, self.position.x, self.position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, TAU};
    use zeilrace_core::UniformWind;

    const SLACK: f64 = 1.0e3;

    fn calm() -> UniformWind {
        UniformWind::calm(1000.0, 1000.0)
    }

    fn breeze(x: f64, y: f64) -> UniformWind {
        UniformWind {
            extent: DVec2::new(1000.0, 1000.0),
            velocity: DVec2::new(x, y),
        }
    }

    fn centred_boat() -> Boat {
        Boat::new(0, DVec2::new(500.0, 500.0), 0.0)
    }

    struct BrokenWind;

    impl WindSource for BrokenWind {
        fn extent(&self) -> DVec2 {
            DVec2::new(1000.0, 1000.0)
        }

        fn velocity(&self, position: DVec2) -> Result<DVec2, SimError> {
            Err(SimError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: 0.0,
                height: 0.0,
            })
        }
    }

    // -- Construction --

    #[test]
    fn new_boat_is_at_rest_and_sailing() {
        let boat = Boat::new(3, DVec2::new(10.0, 20.0), 1.0);
        assert_eq!(boat.id(), 3);
        assert_eq!(boat.position(), DVec2::new(10.0, 20.0));
        assert_eq!(boat.heading(), 1.0);
        assert_eq!(boat.surge(), 0.0);
        assert_eq!(boat.sway(), 0.0);
        assert_eq!(boat.angular_velocity(), 0.0);
        assert_eq!(boat.sail_angle(), 0.0);
        assert!(!boat.sheet_tight());
        assert_eq!(boat.state(), BoatState::Sailing);
        assert_eq!(boat.control(), BoatControl::default());
    }

    #[test]
    fn spawn_jitters_around_anchor() {
        let mut rng = Xorshift64::new(42);
        let anchor = DVec2::new(300.0, 400.0);
        for id in 0..100 {
            let boat = Boat::spawn(id, anchor, 50.0, &mut rng);
            let offset = boat.position() - anchor;
            assert!(offset.x.abs() <= 50.0 && offset.y.abs() <= 50.0, "offset {offset:?}");
            assert!((0.0..TAU).contains(&boat.heading()));
        }
    }

    #[test]
    fn spawn_is_deterministic() {
        let a = Boat::spawn(0, DVec2::new(300.0, 400.0), 50.0, &mut Xorshift64::new(9));
        let b = Boat::spawn(0, DVec2::new(300.0, 400.0), 50.0, &mut Xorshift64::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn spawn_without_jitter_sits_on_anchor() {
        let boat = Boat::spawn(0, DVec2::new(300.0, 400.0), 0.0, &mut Xorshift64::new(1));
        assert_eq!(boat.position(), DVec2::new(300.0, 400.0));
    }

    // -- Controls --

    #[test]
    fn control_rejects_bad_values() {
        assert!(BoatControl::new(f64::NAN, 0.5).is_err());
        assert!(BoatControl::new(0.0, -0.1).is_err());
        assert!(BoatControl::new(0.0, f64::INFINITY).is_err());
        assert!(BoatControl::new(-0.01, 0.0).is_ok());
    }

    #[test]
    fn set_pose_moves_and_stops_the_boat() {
        let mut boat = centred_boat();
        boat.surge = 2.0;
        boat.sway = 0.5;
        boat.angular_velocity = 0.1;
        boat.set_pose(DVec2::new(100.0, 200.0), FRAC_PI_2).unwrap();
        assert_eq!(boat.position(), DVec2::new(100.0, 200.0));
        assert_eq!(boat.heading(), FRAC_PI_2);
        assert_eq!((boat.surge(), boat.sway(), boat.angular_velocity()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn set_pose_rejects_sunk_boats() {
        let mut boat = Boat::new(4, DVec2::new(5.0, 5.0), 0.0);
        boat.update(&calm(), &SailboatParams::default()).unwrap();
        assert_eq!(
            boat.set_pose(DVec2::new(500.0, 500.0), 0.0),
            Err(SimError::BoatSunk(4))
        );
        assert_eq!(boat.position(), DVec2::new(5.0, 5.0));
    }

    #[test]
    fn set_pose_rejects_non_finite_pose() {
        let mut boat = centred_boat();
        assert!(boat.set_pose(DVec2::new(f64::NAN, 1.0), 0.0).is_err());
        assert!(boat.set_pose(DVec2::ONE, f64::INFINITY).is_err());
        assert_eq!(boat.position(), DVec2::new(500.0, 500.0));
    }

    // -- Sail force --

    #[test]
    fn zero_apparent_wind_gives_zero_force_at_any_angle() {
        let params = SailboatParams::default();
        for i in 0..32 {
            let angle = -3.0 + i as f64 * 0.2;
            assert_eq!(sail_force(DVec2::ZERO, angle, &params), DVec2::ZERO);
        }
    }

    #[test]
    fn sail_force_with_centred_sail() {
        let force = sail_force(DVec2::new(1.0, 2.0), 0.0, &SailboatParams::default());
        assert!((force - DVec2::new(1.0, -1.5)).length() < 1e-12, "got {force:?}");
    }

    #[test]
    fn sail_force_turns_by_damped_chord_angle() {
        let params = SailboatParams::default();
        let force = sail_force(DVec2::new(2.0, 0.0), 0.5, &params);
        let expected = DVec2::new(2.0 * 0.4_f64.cos(), 2.0 * 0.4_f64.sin());
        assert!((force - expected).length() < 1e-12, "got {force:?}");
    }

    // -- Update --

    #[test]
    fn calm_boat_at_rest_stays_put() {
        let mut boat = centred_boat();
        let before = boat.clone();
        for _ in 0..10 {
            boat.update(&calm(), &SailboatParams::default()).unwrap();
        }
        assert_eq!(boat.position(), before.position());
        assert_eq!(boat.heading(), before.heading());
        assert!(!boat.sheet_tight());
    }

    #[test]
    fn tight_sheet_drives_the_boat() {
        let params = SailboatParams::default();
        let mut boat = centred_boat();
        boat.set_control(BoatControl::new(0.0, 0.1).unwrap());
        boat.update(&breeze(1.0, 0.0), &params).unwrap();

        // Sail swings by |A| * A.x * 0.2 = 0.2 and is caught at 0.1.
        assert!(boat.sheet_tight());
        assert!((boat.sail_angle() - 0.1).abs() < 1e-12);

        let force = DVec2::new(0.08_f64.cos(), 0.08_f64.sin());
        let sway = force.x * 0.24;
        let surge = force.y * 0.24;
        let yaw = force.x * 0.002;
        assert!((boat.heading() - yaw).abs() < 1e-12);

        let step = rotate(DVec2::new(sway, surge), yaw) + DVec2::new(0.2, 0.0);
        let expected = DVec2::new(500.0, 500.0) + step;
        assert!((boat.position() - expected).length() < 1e-12);

        assert!((boat.sway() - sway * 0.01).abs() < 1e-12);
        assert!((boat.surge() - surge * 0.8).abs() < 1e-12);
        assert!((boat.angular_velocity() - yaw * 0.5).abs() < 1e-12);
    }

    #[test]
    fn slack_sheet_moves_sail_but_not_boat() {
        let params = SailboatParams::default();
        let mut boat = centred_boat();
        boat.set_control(BoatControl::new(0.0, SLACK).unwrap());
        boat.update(&breeze(1.0, 0.0), &params).unwrap();

        assert!(!boat.sheet_tight());
        assert!((boat.sail_angle() - 0.2).abs() < 1e-12);
        assert_eq!(boat.surge(), 0.0);
        assert_eq!(boat.sway(), 0.0);
        assert_eq!(boat.heading(), 0.0);
        // Only windage moves the hull.
        assert!((boat.position() - DVec2::new(500.2, 500.0)).length() < 1e-12);
    }

    #[test]
    fn rudder_has_no_effect_at_rest() {
        let mut boat = centred_boat();
        boat.set_control(BoatControl::new(0.5, SLACK).unwrap());
        boat.update(&calm(), &SailboatParams::default()).unwrap();
        assert_eq!(boat.heading(), 0.0);
    }

    #[test]
    fn rudder_authority_scales_with_speed_squared() {
        let params = SailboatParams::default();
        let turn_at = |surge: f64| {
            let mut boat = centred_boat();
            boat.set_control(BoatControl::new(0.01, SLACK).unwrap());
            boat.surge = surge;
            boat.update(&calm(), &params).unwrap();
            boat.heading()
        };
        assert!((turn_at(1.0) - 0.01).abs() < 1e-12);
        assert!((turn_at(2.0) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn drag_decays_motion_monotonically_in_calm_water() {
        let params = SailboatParams::default();
        let mut boat = centred_boat();
        boat.set_control(BoatControl::new(0.0, SLACK).unwrap());
        boat.surge = 2.0;
        boat.sway = 1.0;
        boat.angular_velocity = 0.3;

        let mut prev = (boat.surge().abs(), boat.sway().abs(), boat.angular_velocity().abs());
        for tick in 0..60 {
            boat.update(&calm(), &params).unwrap();
            let now = (boat.surge().abs(), boat.sway().abs(), boat.angular_velocity().abs());
            assert!(now.0 <= prev.0, "surge grew at tick {tick}: {now:?} vs {prev:?}");
            assert!(now.1 <= prev.1, "sway grew at tick {tick}");
            assert!(now.2 <= prev.2, "angular velocity grew at tick {tick}");
            prev = now;
        }
        assert!(prev.0 < 1e-4 && prev.1 < 1e-12 && prev.2 < 1e-12, "not at rest: {prev:?}");
        assert_eq!(boat.state(), BoatState::Sailing);
    }

    #[test]
    fn each_velocity_scales_by_its_decay_factor() {
        let params = SailboatParams::default();
        let mut boat = centred_boat();
        boat.set_control(BoatControl::new(0.0, SLACK).unwrap());
        boat.surge = 1.0;
        boat.sway = 1.0;
        boat.angular_velocity = 1.0;
        boat.update(&calm(), &params).unwrap();
        assert!((boat.surge() - 0.8).abs() < 1e-12);
        assert!((boat.sway() - 0.01).abs() < 1e-12);
        assert!((boat.angular_velocity() - 0.5).abs() < 1e-12);
    }

    // -- Sinking --

    #[test]
    fn boat_inside_margin_sinks_without_moving() {
        let mut boat = Boat::new(1, DVec2::new(10.0, 500.0), 0.3);
        boat.update(&breeze(3.0, 3.0), &SailboatParams::default()).unwrap();
        assert!(boat.is_sunk());
        assert_eq!(boat.position(), DVec2::new(10.0, 500.0));
        assert_eq!(boat.heading(), 0.3);
    }

    #[test]
    fn boat_crossing_margin_sinks_at_new_position() {
        let params = SailboatParams::default();
        let mut boat = Boat::new(2, DVec2::new(15.5, 500.0), 0.0);
        boat.set_control(BoatControl::new(0.0, SLACK).unwrap());
        boat.update(&breeze(-4.0, 0.0), &params).unwrap();
        assert!(boat.is_sunk());
        assert!((boat.position().x - 14.7).abs() < 1e-12);
    }

    #[test]
    fn sinking_is_terminal() {
        let params = SailboatParams::default();
        let mut boat = Boat::new(1, DVec2::new(985.5, 500.0), 0.0);
        boat.update(&breeze(4.0, 0.0), &params).unwrap();
        let _ = boat.update(&breeze(4.0, 0.0), &params);
        assert!(boat.is_sunk());
        let frozen = boat.clone();
        for _ in 0..20 {
            boat.update(&breeze(-4.0, 4.0), &params).unwrap();
        }
        assert_eq!(boat, frozen);
    }

    #[test]
    fn failed_sample_leaves_boat_untouched() {
        let mut boat = centred_boat();
        boat.surge = 1.0;
        let before = boat.clone();
        let err = boat.update(&BrokenWind, &SailboatParams::default());
        assert!(matches!(err, Err(SimError::OutOfBounds { .. })));
        assert_eq!(boat, before);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn boat_stays_finite_and_inside_or_sinks(
                wx in -4.0_f64..4.0,
                wy in -4.0_f64..4.0,
                heading in 0.0_f64..TAU,
                rudder in -0.05_f64..0.05,
                bound in 0.0_f64..1.5,
            ) {
                let wind = breeze(wx, wy);
                let params = SailboatParams::default();
                let mut boat = Boat::new(0, DVec2::new(500.0, 500.0), heading);
                boat.set_control(BoatControl::new(rudder, bound).unwrap());
                for _ in 0..300 {
                    boat.update(&wind, &params).unwrap();
                }
                let p = boat.position();
                prop_assert!(is_finite(p) && boat.heading().is_finite());
                if !boat.is_sunk() {
                    prop_assert!(!near_edge(p, wind.extent()), "sailing boat at {p:?}");
                }
            }

            #[test]
            fn zero_wind_force_is_zero_for_any_angle(angle in -10.0_f64..10.0) {
                let force = sail_force(DVec2::ZERO, angle, &SailboatParams::default());
                prop_assert_eq!(force, DVec2::ZERO);
            }
        }
    }
}
