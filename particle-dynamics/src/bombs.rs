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
//! Explosion events and their acceleration field
//!
//! A [`Bomb`] is a radial acceleration field that switches on at its start
//! time, spreads outward behind a shock front moving at `expansion_rate`,
//! and fades linearly to nothing over `duration` seconds:
//!
//! ```text
//! elapsed = t - start
//! active  : 0 <= elapsed < duration  and  0 < dist < elapsed * expansion_rate
//! |a|     = 1 / (dist * (c0*dist² + c1*dist + c2)) * (1 - elapsed / duration)
//! ```
//!
//! The field points away from the origin. Spent bombs stay in the
//! [`BombRegistry`] until it is cleared; they simply contribute nothing.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Base bomb constants, scaled per bomb by its strength
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BombSettings {
    /// Lifetime of a unit-strength bomb in seconds
    pub duration: f64,
    /// Shock front speed of a unit-strength bomb
    pub expansion_rate: f64,
    /// Falloff polynomial (c0, c1, c2) of a unit-strength bomb
    pub falloff: [f64; 3],
}

impl Default for BombSettings {
    fn default() -> Self {
        BombSettings {
            duration: 0.5,
            expansion_rate: 2.0,
            falloff: [1.0, 0.5, 0.5],
        }
    }
}

impl BombSettings {
    /// Check the constants describe a usable bomb
    pub fn validate(&self) -> Result<(), String> {
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return Err(format!("Bomb duration must be positive and finite, got {}", self.duration));
        }
        if !(self.expansion_rate > 0.0 && self.expansion_rate.is_finite()) {
            return Err(format!(
                "Bomb expansion rate must be positive and finite, got {}",
                self.expansion_rate
            ));
        }
        if self.falloff.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(format!(
                "Bomb falloff coefficients must be non-negative and finite, got {:?}",
                self.falloff
            ));
        }
        Ok(())
    }
}

/// A single explosion event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bomb {
    /// Centre of the blast
    pub origin: DVec3,
    /// Simulation time at which the blast starts
    pub start_time: f64,
    /// Speed of the shock front
    pub expansion_rate: f64,
    /// Seconds until the blast is spent
    pub duration: f64,
    /// Falloff polynomial (c0, c1, c2)
    pub falloff: [f64; 3],
}

impl Bomb {
    /// Whether the bomb contributes anything at `time`
    pub fn is_active(&self, time: f64) -> bool {
        let elapsed = time - self.start_time;
        elapsed >= 0.0 && elapsed < self.duration
    }

    /// Radius of the shock front at `time` (zero before the start)
    pub fn front_radius(&self, time: f64) -> f64 {
        ((time - self.start_time) * self.expansion_rate).max(0.0)
    }

    /// Acceleration this bomb imparts at `point` at `time`
    ///
    /// Zero outside the active window, at the origin itself, and at or
    /// beyond the shock front.
    pub fn acceleration_at(&self, point: DVec3, time: f64) -> DVec3 {
        if !self.is_active(time) {
            return DVec3::ZERO;
        }
        let elapsed = time - self.start_time;
        let offset = point - self.origin;
        let distance = offset.length();
        if distance == 0.0 || distance >= elapsed * self.expansion_rate {
            return DVec3::ZERO;
        }

        let [c0, c1, c2] = self.falloff;
        let magnitude = 1.0 / (distance * (c0 * distance * distance + c1 * distance + c2));
        if !magnitude.is_finite() {
            return DVec3::ZERO;
        }
        let ramp = 1.0 - elapsed / self.duration;
        (offset / distance) * (magnitude * ramp)
    }
}

/// Growable, clearable set of bombs
#[derive(Debug, Clone, Default)]
pub struct BombRegistry {
    settings: BombSettings,
    bombs: Vec<Bomb>,
}

impl BombRegistry {
    /// Create an empty registry using the given base constants
    ///
    /// # Panics
    ///
    /// Panics if the settings fail validation
    pub fn new(settings: BombSettings) -> Self {
        if let Err(e) = settings.validate() {
            panic!("{}", e);
        }
        BombRegistry {
            settings,
            bombs: Vec::new(),
        }
    }

    /// Base constants
    pub fn settings(&self) -> &BombSettings {
        &self.settings
    }

    /// Drop every bomb
    pub fn clear(&mut self) {
        self.bombs.clear();
    }

    /// Register a bomb scaled by `strength`
    ///
    /// Duration and expansion rate are multiplied by the strength and the
    /// falloff coefficients divided by it, so a stronger bomb lasts longer,
    /// spreads faster and pushes harder. A non-positive or non-finite
    /// strength adds nothing and returns `None`.
    pub fn add(&mut self, start_time: f64, origin: DVec3, strength: f64) -> Option<&Bomb> {
        if !(strength > 0.0 && strength.is_finite()) {
            log::warn!(
                "Ignoring bomb at {:?} with unusable strength {}",
                origin,
                strength
            );
            return None;
        }
        let base = &self.settings;
        let bomb = Bomb {
            origin,
            start_time,
            expansion_rate: base.expansion_rate * strength,
            duration: base.duration * strength,
            falloff: base.falloff.map(|c| c / strength),
        };
        log::debug!(
            "Bomb #{} at {:?}, t={:.4}, strength {:.3}",
            self.bombs.len(),
            origin,
            start_time,
            strength
        );
        self.bombs.push(bomb);
        self.bombs.last()
    }

    /// Number of registered bombs, spent ones included
    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    /// Whether no bombs are registered
    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }

    /// All registered bombs
    pub fn iter(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter()
    }

    /// Bombs still contributing at `time`
    pub fn active_at(&self, time: f64) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter().filter(move |b| b.is_active(time))
    }

    /// Summed acceleration of all bombs at `point`
    pub fn acceleration_at(&self, point: DVec3, time: f64) -> DVec3 {
        self.bombs
            .iter()
            .map(|b| b.acceleration_at(point, time))
            .fold(DVec3::ZERO, |acc, a| acc + a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bomb() -> Bomb {
        Bomb {
            origin: DVec3::ZERO,
            start_time: 1.0,
            expansion_rate: 1.0,
            duration: 2.0,
            falloff: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn test_zero_distance_has_no_singularity() {
        let bomb = unit_bomb();
        assert_eq!(bomb.acceleration_at(DVec3::ZERO, 1.5), DVec3::ZERO);
    }

    #[test]
    fn test_front_is_exclusive() {
        let bomb = unit_bomb();
        // elapsed 0.5, front at 0.5
        assert_eq!(bomb.acceleration_at(DVec3::new(0.5, 0.0, 0.0), 1.5), DVec3::ZERO);
        assert_eq!(bomb.acceleration_at(DVec3::new(0.6, 0.0, 0.0), 1.5), DVec3::ZERO);
        assert!(bomb.acceleration_at(DVec3::new(0.4, 0.0, 0.0), 1.5).x > 0.0);
    }

    #[test]
    fn test_magnitude_and_ramp() {
        let bomb = unit_bomb();
        // elapsed 1.0 -> ramp 0.5; dist 0.5 with c2 = 1 -> 1 / 0.5 = 2
        let a = bomb.acceleration_at(DVec3::new(0.0, -0.5, 0.0), 2.0);
        assert!(a.abs_diff_eq(DVec3::new(0.0, -1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_inactive_outside_window() {
        let bomb = unit_bomb();
        let p = DVec3::new(0.1, 0.0, 0.0);
        assert_eq!(bomb.acceleration_at(p, 0.9), DVec3::ZERO);
        assert_eq!(bomb.acceleration_at(p, 3.0), DVec3::ZERO);
        assert_eq!(bomb.acceleration_at(p, 3.5), DVec3::ZERO);
    }

    #[test]
    fn test_strength_scaling() {
        let mut registry = BombRegistry::new(BombSettings::default());
        let base = *registry.settings();
        let bomb = *registry.add(0.0, DVec3::ZERO, 2.0).unwrap();
        assert_eq!(bomb.duration, base.duration * 2.0);
        assert_eq!(bomb.expansion_rate, base.expansion_rate * 2.0);
        assert_eq!(bomb.falloff[2], base.falloff[2] / 2.0);
    }

    #[test]
    fn test_unusable_strength_is_ignored() {
        let mut registry = BombRegistry::new(BombSettings::default());
        assert!(registry.add(0.0, DVec3::ZERO, 0.0).is_none());
        assert!(registry.add(0.0, DVec3::ZERO, f64::NAN).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_spent_bombs_stay_until_clear() {
        let mut registry = BombRegistry::new(BombSettings::default());
        registry.add(0.0, DVec3::ZERO, 1.0);
        registry.add(0.0, DVec3::X, 1.0);
        assert_eq!(registry.active_at(100.0).count(), 0);
        assert_eq!(registry.len(), 2);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_contributions_sum() {
        let mut registry = BombRegistry::new(BombSettings::default());
        registry.add(0.0, DVec3::new(-1.0, 0.0, 0.0), 1.0);
        registry.add(0.0, DVec3::new(1.0, 0.0, 0.0), 1.0);
        // Symmetric blasts cancel at the midpoint
        let a = registry.acceleration_at(DVec3::ZERO, 0.6);
        assert!(a.abs_diff_eq(DVec3::ZERO, 1e-12));
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = BombSettings::default();
        assert!(settings.validate().is_ok());
        settings.duration = 0.0;
        assert!(settings.validate().unwrap_err().contains("duration"));
    }
}
