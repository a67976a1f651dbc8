//! Tunable coefficients of the sailboat force model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use zeilrace_core::params::param_f64;

/// How strongly across-sail wind pressure swings the sail per tick.
const DEFAULT_TRIM_GAIN: f64 = 0.2;
/// Along-sail component of the sail force, relative to the across-sail one.
const DEFAULT_LIFT_RATIO: f64 = 0.75;
/// Effective chord angle as a fraction of the stored sail angle.
const DEFAULT_CHORD_FACTOR: f64 = 0.8;
/// Sail force to body-velocity gain while the sheet is tight.
const DEFAULT_THRUST_GAIN: f64 = 0.24;
/// Sail force to angular-velocity gain while the sheet is tight.
const DEFAULT_TORQUE_GAIN: f64 = 0.002;
/// Fraction of the true wind that pushes the hull directly.
const DEFAULT_WINDAGE: f64 = 0.2;
const DEFAULT_SWAY_DECAY: f64 = 0.01;
const DEFAULT_SURGE_DECAY: f64 = 0.8;
const DEFAULT_YAW_DECAY: f64 = 0.5;

/// Coefficients of the per-tick boat update.
///
/// [`Default`] gives the reference tuning. Decay factors are multipliers
/// applied once per tick, so values below 1 damp motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SailboatParams {
    pub trim_gain: f64,
    pub lift_ratio: f64,
    pub chord_factor: f64,
    pub thrust_gain: f64,
    pub torque_gain: f64,
    pub windage: f64,
    pub sway_decay: f64,
    pub surge_decay: f64,
    pub yaw_decay: f64,
}

impl Default for SailboatParams {
    fn default() -> Self {
        Self {
            trim_gain: DEFAULT_TRIM_GAIN,
            lift_ratio: DEFAULT_LIFT_RATIO,
            chord_factor: DEFAULT_CHORD_FACTOR,
            thrust_gain: DEFAULT_THRUST_GAIN,
            torque_gain: DEFAULT_TORQUE_GAIN,
            windage: DEFAULT_WINDAGE,
            sway_decay: DEFAULT_SWAY_DECAY,
            surge_decay: DEFAULT_SURGE_DECAY,
            yaw_decay: DEFAULT_YAW_DECAY,
        }
    }
}

impl SailboatParams {
    /// Reads overrides from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            trim_gain: param_f64(params, "trim_gain", DEFAULT_TRIM_GAIN),
            lift_ratio: param_f64(params, "lift_ratio", DEFAULT_LIFT_RATIO),
            chord_factor: param_f64(params, "chord_factor", DEFAULT_CHORD_FACTOR),
            thrust_gain: param_f64(params, "thrust_gain", DEFAULT_THRUST_GAIN),
            torque_gain: param_f64(params, "torque_gain", DEFAULT_TORQUE_GAIN),
            windage: param_f64(params, "windage", DEFAULT_WINDAGE),
            sway_decay: param_f64(params, "sway_decay", DEFAULT_SWAY_DECAY),
            surge_decay: param_f64(params, "surge_decay", DEFAULT_SURGE_DECAY),
            yaw_decay: param_f64(params, "yaw_decay", DEFAULT_YAW_DECAY),
        }
    }

    /// Current values as a JSON object, keyed like [`SailboatParams::from_json`].
    pub fn to_json(&self) -> Value {
        json!({
            "trim_gain": self.trim_gain,
            "lift_ratio": self.lift_ratio,
            "chord_factor": self.chord_factor,
            "thrust_gain": self.thrust_gain,
            "torque_gain": self.torque_gain,
            "windage": self.windage,
            "sway_decay": self.sway_decay,
            "surge_decay": self.surge_decay,
            "yaw_decay": self.yaw_decay,
        })
    }

    /// Schema describing every coefficient: type, default, range, meaning.
    pub fn param_schema() -> Value {
        json!({
            "trim_gain": {
                "type": "number",
                "default": DEFAULT_TRIM_GAIN,
                "min": 0.0,
                "max": 1.0,
                "description": "Sail swing per tick from across-sail wind pressure"
            },
            "lift_ratio": {
                "type": "number",
                "default": DEFAULT_LIFT_RATIO,
                "min": 0.0,
                "max": 2.0,
                "description": "Along-sail force relative to across-sail force"
            },
            "chord_factor": {
                "type": "number",
                "default": DEFAULT_CHORD_FACTOR,
                "min": 0.0,
                "max": 1.0,
                "description": "Effective sail chord angle as a fraction of the trim angle"
            },
            "thrust_gain": {
                "type": "number",
                "default": DEFAULT_THRUST_GAIN,
                "min": 0.0,
                "max": 1.0,
                "description": "Sail force to surge/sway velocity gain (sheet tight only)"
            },
            "torque_gain": {
                "type": "number",
                "default": DEFAULT_TORQUE_GAIN,
                "min": 0.0,
                "max": 0.1,
                "description": "Sail force to angular velocity gain (sheet tight only)"
            },
            "windage": {
                "type": "number",
                "default": DEFAULT_WINDAGE,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of true wind pushing the hull and rig directly"
            },
            "sway_decay": {
                "type": "number",
                "default": DEFAULT_SWAY_DECAY,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-tick multiplier on sideways velocity"
            },
            "surge_decay": {
                "type": "number",
                "default": DEFAULT_SURGE_DECAY,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-tick multiplier on forward velocity"
            },
            "yaw_decay": {
                "type": "number",
                "default": DEFAULT_YAW_DECAY,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-tick multiplier on angular velocity"
            }
        })
    }
}
