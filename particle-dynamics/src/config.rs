// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Simulation configuration
//!
//! [`SimulationConfig`] gathers every tunable of the explosion scene in one
//! serializable struct. It can be loaded from JSON, partially overridden from
//! the environment, and validated before any simulation object is built.
//!
//! # Environment overrides
//!
//! - `PARTICLE_DYNAMICS_STEP`: fixed integration step in seconds
//! - `PARTICLE_DYNAMICS_INTEGRATOR`: `euler`, `trapezoid`, `rk4` (or `e`/`t`/`r`)
//!
//! Unparseable values are logged and ignored.

use crate::bombs::BombSettings;
use crate::collision::CollisionDetector;
use crate::forces::ExplodingSystem;
use crate::integration::{validate_timestep, IntegratorKind};
use anyhow::{bail, ensure, Context, Result};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`SimulationConfig::fixed_step`]
pub const STEP_ENV_VAR: &str = "PARTICLE_DYNAMICS_STEP";

/// Environment variable overriding [`SimulationConfig::integrator`]
pub const INTEGRATOR_ENV_VAR: &str = "PARTICLE_DYNAMICS_INTEGRATOR";

/// Projectile sphere settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    /// Collision radius
    pub radius: f64,
    /// Centre at simulation time zero
    pub start: DVec3,
    /// Constant velocity
    pub velocity: DVec3,
}

impl Default for SphereConfig {
    fn default() -> Self {
        SphereConfig {
            radius: 0.05,
            start: DVec3::new(-0.67, 0.2, 0.0),
            velocity: DVec3::new(0.8, 0.0, 0.0),
        }
    }
}

/// Everything needed to build an explosion scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed integration step in seconds
    pub fixed_step: f64,
    /// Integration scheme
    pub integrator: IntegratorKind,
    /// Gravity acting on fragments
    pub gravity: DVec3,
    /// Linear drag acting on fragments
    pub drag: f64,
    /// Projectile sphere
    pub sphere: SphereConfig,
    /// Base bomb constants
    pub bombs: BombSettings,
    /// Exponent applied to the impact alignment when sizing a bomb
    pub strength_exponent: f64,
    /// Speed along the vertex normal given to every fragment vertex at start
    pub initial_normal_speed: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            fixed_step: 0.005,
            integrator: IntegratorKind::Rk4,
            gravity: DVec3::ZERO,
            drag: 0.0,
            sphere: SphereConfig::default(),
            bombs: BombSettings::default(),
            strength_exponent: 1.0,
            initial_normal_speed: 0.05,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig =
            serde_json::from_str(json).context("Failed to parse simulation config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize simulation config")
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = validate_timestep(self.fixed_step) {
            if !(self.fixed_step > 0.0 && self.fixed_step.is_finite()) {
                bail!(e);
            }
            // Extreme but usable steps only warrant a warning
            log::warn!("{}", e);
        }
        ensure!(
            self.gravity.is_finite(),
            "Gravity must be finite, got {:?}",
            self.gravity
        );
        ensure!(
            self.drag >= 0.0 && self.drag.is_finite(),
            "Drag coefficient must be non-negative and finite, got {}",
            self.drag
        );
        ensure!(
            self.sphere.radius > 0.0 && self.sphere.radius.is_finite(),
            "Sphere radius must be positive and finite, got {}",
            self.sphere.radius
        );
        ensure!(
            self.sphere.start.is_finite() && self.sphere.velocity.is_finite(),
            "Sphere start and velocity must be finite"
        );
        ensure!(
            self.strength_exponent >= 0.0 && self.strength_exponent.is_finite(),
            "Strength exponent must be non-negative and finite, got {}",
            self.strength_exponent
        );
        ensure!(
            self.initial_normal_speed.is_finite(),
            "Initial normal speed must be finite, got {}",
            self.initial_normal_speed
        );
        self.bombs.validate().map_err(anyhow::Error::msg)?;
        Ok(())
    }

    /// Apply `PARTICLE_DYNAMICS_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Values that fail to parse are logged and leave the field unchanged.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(STEP_ENV_VAR) {
            match raw.trim().parse::<f64>() {
                Ok(step) if step > 0.0 && step.is_finite() => {
                    log::debug!("{} overrides fixed step to {}", STEP_ENV_VAR, step);
                    self.fixed_step = step;
                }
                _ => log::warn!("Ignoring {}={:?}: not a positive step", STEP_ENV_VAR, raw),
            }
        }

        if let Some(raw) = lookup(INTEGRATOR_ENV_VAR) {
            match raw.parse::<IntegratorKind>() {
                Ok(kind) => {
                    log::debug!("{} overrides integrator to {}", INTEGRATOR_ENV_VAR, kind);
                    self.integrator = kind;
                }
                Err(e) => log::warn!("Ignoring {}: {}", INTEGRATOR_ENV_VAR, e),
            }
        }
    }

    /// Exploding force system with this configuration's gravity, drag and bombs
    pub fn exploding_system(&self) -> ExplodingSystem {
        ExplodingSystem::new(self.bombs)
            .with_gravity(self.gravity)
            .with_drag(self.drag)
    }

    /// Collision detector for the configured sphere
    pub fn detector(&self) -> CollisionDetector {
        CollisionDetector::new(self.sphere.radius)
    }
}
