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
//! Fixed-step time accumulator
//!
//! Frames arrive with whatever wall-clock delta the host loop measured; the
//! simulation only ever advances in whole multiples of a fixed step. The
//! accumulator carries the leftover fraction from frame to frame:
//!
//! ```text
//! steps     = floor((frame_time + remainder) / fixed_step)
//! remainder = frame_time + remainder - steps * fixed_step
//! ```
//!
//! Splitting the same elapsed time into different frames yields the same
//! total number of steps, up to floating-point precision.

/// Fraction of a step forgiven when flooring, so that sums such as
/// 0.017 + 0.013 land on 3 steps of 0.01 instead of 2.
const STEP_TOLERANCE: f64 = 1e-9;

/// Converts variable frame times into a count of fixed steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAccumulator {
    fixed_step: f64,
    remainder: f64,
}

impl TimeAccumulator {
    /// Create an accumulator with an empty remainder
    ///
    /// # Panics
    ///
    /// Panics if the step is non-positive, NaN, or infinite
    pub fn new(fixed_step: f64) -> Self {
        assert!(
            fixed_step > 0.0 && fixed_step.is_finite(),
            "Timestep must be positive and finite"
        );
        TimeAccumulator {
            fixed_step,
            remainder: 0.0,
        }
    }

    /// The fixed step size
    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    /// Time carried over that has not yet made a whole step
    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    /// Forget the carried remainder
    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }

    /// Add a frame's elapsed time and return how many fixed steps to run
    ///
    /// # Panics
    ///
    /// Panics if `frame_time` is negative or not finite
    pub fn advance(&mut self, frame_time: f64) -> usize {
        assert!(
            frame_time >= 0.0 && frame_time.is_finite(),
            "Frame time must be non-negative and finite"
        );
        let available = frame_time + self.remainder;
        let steps = (available / self.fixed_step + STEP_TOLERANCE).floor();
        self.remainder = (available - steps * self.fixed_step).max(0.0);
        steps as usize
    }

    /// Start times of `steps` consecutive fixed steps beginning at `base_time`
    pub fn step_times(&self, base_time: f64, steps: usize) -> impl Iterator<Item = f64> {
        let dt = self.fixed_step;
        (0..steps).map(move |i| base_time + i as f64 * dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_sequence_matches_cumulative_floor() {
        let mut acc = TimeAccumulator::new(0.01);
        let frames = [0.017, 0.013, 0.01];
        let expected_totals = [1, 3, 4];
        let mut total_steps = 0;
        let mut elapsed = 0.0;
        for (frame, expected) in frames.iter().zip(expected_totals) {
            total_steps += acc.advance(*frame);
            elapsed += frame;
            assert_eq!(total_steps, expected);
            let remainder = elapsed - total_steps as f64 * 0.01;
            assert!((acc.remainder() - remainder).abs() < 1e-9);
        }
    }

    #[test]
    fn test_short_frames_carry_forward() {
        let mut acc = TimeAccumulator::new(0.01);
        assert_eq!(acc.advance(0.004), 0);
        assert_eq!(acc.advance(0.004), 0);
        assert_eq!(acc.advance(0.004), 1);
        assert!((acc.remainder() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_zero_frame_time() {
        let mut acc = TimeAccumulator::new(0.01);
        assert_eq!(acc.advance(0.0), 0);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn test_step_times() {
        let acc = TimeAccumulator::new(0.5);
        let times: Vec<f64> = acc.step_times(1.0, 3).collect();
        assert_eq!(times, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_reset() {
        let mut acc = TimeAccumulator::new(0.01);
        acc.advance(0.015);
        acc.reset();
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    #[should_panic(expected = "Timestep must be positive and finite")]
    fn test_invalid_step() {
        TimeAccumulator::new(0.0);
    }

    #[test]
    #[should_panic(expected = "Frame time must be non-negative and finite")]
    fn test_negative_frame_time() {
        TimeAccumulator::new(0.01).advance(-0.1);
    }
}
