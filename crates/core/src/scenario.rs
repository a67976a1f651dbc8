//! Reproducible description of a simulation run.
//!
//! A [`Scenario`] captures everything needed to replay a run: world size,
//! agent counts, seed, field time parameter, step count and timestep, plus a
//! free-form params object for dynamics overrides. Two identical scenarios
//! produce bit-identical snapshots.

use serde::{Deserialize, Serialize};

use crate::error::SimError;

fn default_dt() -> f64 {
    1.0
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub world_width: f64,
    pub world_height: f64,
    pub particles: usize,
    pub boats: usize,
    pub seed: u64,
    #[serde(default)]
    pub steps: usize,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default)]
    pub time_param: f64,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

impl Scenario {
    /// Creates a scenario with no steps, `dt = 1` and empty params.
    pub fn new(world_width: f64, world_height: f64, particles: usize, boats: usize, seed: u64) -> Self {
        Self {
            world_width,
            world_height,
            particles,
            boats,
            seed,
            steps: 0,
            dt: default_dt(),
            time_param: 0.0,
            params: empty_params(),
        }
    }

    /// Checks world dimensions, timestep and time parameter.
    pub fn validate(&self) -> Result<(), SimError> {
        let dims_ok = self.world_width.is_finite()
            && self.world_width > 0.0
            && self.world_height.is_finite()
            && self.world_height > 0.0;
        if !dims_ok {
            return Err(SimError::InvalidConfiguration(format!(
                "world dimensions must be positive and finite, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidTimestep(self.dt));
        }
        if !self.time_param.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "time parameter must be finite, got {}",
                self.time_param
            )));
        }
        if !self.params.is_object() {
            return Err(SimError::InvalidConfiguration(
                "params must be a JSON object".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_uses_defaults() {
        let s = Scenario::new(1200.0, 800.0, 1000, 3, 42);
        assert_eq!(s.steps, 0);
        assert_eq!(s.dt, 1.0);
        assert_eq!(s.time_param, 0.0);
        assert_eq!(s.params, json!({}));
    }

    #[test]
    fn json_round_trip() {
        let mut s = Scenario::new(1200.0, 800.0, 500, 1, 7);
        s.steps = 1000;
        s.params = json!({"trim_gain": 0.25});
        let text = serde_json::to_string_pretty(&s).unwrap();
        let back: Scenario = serde_json::from_str(&text).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let text = r#"{"world_width": 600, "world_height": 400, "particles": 10, "boats": 1, "seed": 3}"#;
        let s: Scenario = serde_json::from_str(text).unwrap();
        assert_eq!(s.dt, 1.0);
        assert_eq!(s.steps, 0);
        assert!(s.params.is_object());
    }

    #[test]
    fn validate_accepts_default_scenario() {
        assert!(Scenario::new(1200.0, 800.0, 0, 0, 1).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_dimensions() {
        assert!(Scenario::new(0.0, 800.0, 0, 0, 1).validate().is_err());
        assert!(Scenario::new(1200.0, -5.0, 0, 0, 1).validate().is_err());
        assert!(Scenario::new(f64::NAN, 800.0, 0, 0, 1).validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_dt() {
        let mut s = Scenario::new(100.0, 100.0, 0, 0, 1);
        s.dt = 0.0;
        assert_eq!(s.validate(), Err(SimError::InvalidTimestep(0.0)));
    }

    #[test]
    fn validate_rejects_non_object_params() {
        let mut s = Scenario::new(100.0, 100.0, 0, 0, 1);
        s.params = json!([1, 2]);
        assert!(s.validate().is_err());
    }
}
