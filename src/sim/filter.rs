//! Tilt input smoothing
//!
//! Two stages turn a noisy accelerometer component into a stable actor
//! position: an exponential moving average over raw samples, then an easing
//! step that moves the actor toward the mapped target each tick.

use crate::consts::TILT_HALF_RANGE;

/// Exponential moving average over one sensor axis
#[derive(Debug, Clone)]
pub struct FilteredAxis {
    current: f32,
    strength: f32,
    /// Set once a live sample has seeded `current`
    primed: bool,
}

impl FilteredAxis {
    pub fn new(strength: f32) -> Self {
        Self {
            current: 0.0,
            strength: strength.clamp(0.0, 1.0),
            primed: false,
        }
    }

    /// Seed the filter with a live sample (avoids the jump from a zeroed start)
    pub fn reset(&mut self, sample: f32) {
        self.current = sample;
        self.primed = true;
    }

    /// Fold a sample into the average and return the new value
    pub fn update(&mut self, sample: f32) -> f32 {
        self.current = self.current * (1.0 - self.strength) + sample * self.strength;
        self.current
    }

    /// Feed a sample, seeding the filter with it if no live sample was seen yet
    pub fn feed(&mut self, sample: f32) -> f32 {
        if self.primed {
            self.update(sample)
        } else {
            self.reset(sample);
            self.current
        }
    }

    /// Forget the seed so the next live sample re-primes the filter
    pub fn unprime(&mut self) {
        self.primed = false;
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    #[inline]
    pub fn is_primed(&self) -> bool {
        self.primed
    }
}

/// Linear map from a signed physical reading to the `[0, 1]` control axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    pub half_range: f32,
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self {
            half_range: TILT_HALF_RANGE,
        }
    }
}

impl AxisMapping {
    /// `-half_range` maps to 0, `+half_range` maps to 1, everything else is clamped
    pub fn target(&self, filtered: f32) -> f32 {
        let range = self.half_range * 2.0;
        let t = (filtered + self.half_range) / range;
        if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) }
    }
}

/// The player's paddle or plane, as a position along the control axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerActor {
    /// Normalized position (0 = top/left edge, 1 = bottom/right edge)
    pub axis_pos: f32,
}

impl Default for PlayerActor {
    fn default() -> Self {
        Self { axis_pos: 0.5 }
    }
}

impl PlayerActor {
    /// Ease toward `target` by `rate` of the remaining distance
    pub fn approach(&mut self, target: f32, rate: f32) {
        self.axis_pos += (target - self.axis_pos) * rate;
        self.axis_pos = self.axis_pos.clamp(0.0, 1.0);
    }

    /// Pixel offset of the actor's leading edge along an axis of `span` pixels
    /// for an actor `extent` pixels long
    #[inline]
    pub fn edge(&self, span: f32, extent: f32) -> f32 {
        self.axis_pos * (span - extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reset_sets_current() {
        let mut axis = FilteredAxis::new(0.15);
        assert!(!axis.is_primed());
        axis.reset(0.2);
        assert!(axis.is_primed());
        assert_eq!(axis.current(), 0.2);
    }

    #[test]
    fn test_strength_is_clamped() {
        assert_eq!(FilteredAxis::new(0.15).strength(), 0.15);
        assert_eq!(FilteredAxis::new(1.5).strength(), 1.0);
        assert_eq!(FilteredAxis::new(-0.2).strength(), 0.0);
    }

    #[test]
    fn test_update_rule() {
        let mut axis = FilteredAxis::new(0.25);
        axis.reset(0.0);
        let v = axis.update(1.0);
        assert!((v - 0.25).abs() < 1e-6);
        let v = axis.update(1.0);
        assert!((v - 0.4375).abs() < 1e-6);
    }

    #[test]
    fn test_feed_primes_on_first_sample() {
        let mut axis = FilteredAxis::new(0.15);
        assert_eq!(axis.feed(-0.1), -0.1);
        assert!(axis.is_primed());
        let v = axis.feed(0.0);
        assert!((v - (-0.085)).abs() < 1e-6);

        axis.unprime();
        assert_eq!(axis.feed(0.3), 0.3);
    }

    #[test]
    fn test_convergence_within_30_ticks() {
        let mut axis = FilteredAxis::new(0.15);
        axis.reset(0.0);
        let target = 0.25;
        for _ in 0..30 {
            axis.update(target);
        }
        assert!((axis.current() - target).abs() <= target * 0.01);
    }

    #[test]
    fn test_mapping_edges() {
        let map = AxisMapping::default();
        assert_eq!(map.target(-0.3), 0.0);
        assert_eq!(map.target(0.3), 1.0);
        assert!((map.target(0.0) - 0.5).abs() < 1e-6);
        assert_eq!(map.target(-5.0), 0.0);
        assert_eq!(map.target(5.0), 1.0);
        assert_eq!(map.target(f32::NAN), 0.5);
    }

    #[test]
    fn test_actor_edge() {
        let actor = PlayerActor { axis_pos: 0.5 };
        assert_eq!(actor.edge(128.0, 24.0), 52.0);
    }

    proptest! {
        #[test]
        fn prop_axis_pos_stays_in_bounds(
            samples in prop::collection::vec(-4.0f32..4.0, 1..400),
            rate in 0.0f32..1.0,
        ) {
            let mut axis = FilteredAxis::new(0.15);
            let map = AxisMapping::default();
            let mut actor = PlayerActor::default();
            for s in samples {
                let target = map.target(axis.feed(s));
                actor.approach(target, rate);
                prop_assert!((0.0..=1.0).contains(&actor.axis_pos));
            }
        }

        #[test]
        fn prop_constant_input_converges(s in -1.0f32..1.0, start in -1.0f32..1.0) {
            let mut axis = FilteredAxis::new(0.15);
            axis.reset(start);
            for _ in 0..200 {
                axis.update(s);
            }
            prop_assert!((axis.current() - s).abs() < 1e-3);
        }
    }
}
