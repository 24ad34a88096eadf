// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation settings loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::collision::{ResolutionParams, THRESHOLD};
use crate::error::{PhysicsError, Result};
use crate::forces::STANDARD_GRAVITY;

/// Tunables for a [`crate::World`].
///
/// Missing JSON fields fall back to [`SimConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Solver name passed to [`crate::solver::create_solver`].
    pub solver: String,
    /// Initial integrator step size.
    pub step_size: f64,
    /// Magnitude of uniform gravity along -Y.
    pub gravity: f64,
    /// Restitution coefficient used when resolving contacts.
    pub restitution: f64,
    /// Relative normal velocity at or below which a contact is colliding.
    pub collision_threshold: f64,
    /// Floor for step-size halving after an impulse.
    pub min_step_size: f64,
    /// Upper bound on full scans of the contact list per tick.
    pub max_collision_passes: usize,
    /// Restore `step_size` at the start of every tick.
    pub restore_step_size: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            solver: "euler".to_owned(),
            step_size: 0.01,
            gravity: STANDARD_GRAVITY,
            restitution: 0.5,
            collision_threshold: THRESHOLD,
            min_step_size: 1e-8,
            max_collision_passes: 64,
            restore_step_size: true,
        }
    }
}

impl SimConfig {
    /// Parses and validates a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values outside each field's domain.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f64) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(PhysicsError::InvalidArgument(format!(
                    "{name} must be positive, got {v}"
                )))
            }
        }
        positive("step_size", self.step_size)?;
        positive("min_step_size", self.min_step_size)?;
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "gravity must be a non-negative magnitude, got {}",
                self.gravity
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidArgument(format!(
                "restitution must lie in [0, 1], got {}",
                self.restitution
            )));
        }
        if !self.collision_threshold.is_finite() {
            return Err(PhysicsError::InvalidArgument(
                "collision_threshold must be finite".to_owned(),
            ));
        }
        if self.max_collision_passes == 0 {
            return Err(PhysicsError::InvalidArgument(
                "max_collision_passes must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parameters for [`crate::collision::find_all_collisions`].
    pub fn resolution_params(&self) -> ResolutionParams {
        ResolutionParams {
            restitution: self.restitution,
            threshold: self.collision_threshold,
            min_step_size: self.min_step_size,
            max_passes: self.max_collision_passes,
        }
    }
}
