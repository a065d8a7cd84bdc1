//! Run parameters supplied by the collaborator when starting a session.
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::selection::VertexRule;

/// Iteration target used by [`RunParams::default`].
pub const DEFAULT_ITERATIONS: u64 = 20_000;

/// Inter-point delay used by [`RunParams::default`].
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1);

/// Configuration for one generation session.
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Total number of points to emit, including the start point. Must be >= 1.
    pub iterations: u64,
    /// Pause before each generated point after the first.
    pub delay: Duration,
    /// Constraint on consecutive vertex picks.
    pub vertex_rule: VertexRule,
    /// Fixed RNG seed for reproducible runs; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            delay: DEFAULT_DELAY,
            vertex_rule: VertexRule::Unrestricted,
            seed: None,
        }
    }
}

impl RunParams {
    /// Creates parameters for `iterations` points with the default delay.
    pub fn new(iterations: u64) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Sets the inter-point delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the inter-point delay in milliseconds.
    pub fn with_delay_ms(self, millis: u64) -> Self {
        self.with_delay(Duration::from_millis(millis))
    }

    /// Sets the vertex selection rule.
    pub fn with_vertex_rule(mut self, rule: VertexRule) -> Self {
        self.vertex_rule = rule;
        self
    }

    /// Uses a deterministic generator seeded with `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the parameters against the number of shapes in the run.
    pub fn validate(&self, shape_count: usize) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be >= 1".into()));
        }
        if self.vertex_rule == VertexRule::DifferentThanPrevious && shape_count > 1 {
            return Err(Error::InvalidConfig(format!(
                "vertex rule {:?} is only defined for a single shape, got {shape_count}",
                self.vertex_rule
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_control_panel() {
        let params = RunParams::default();
        assert_eq!(params.iterations, 20_000);
        assert_eq!(params.delay, Duration::from_millis(1));
        assert_eq!(params.vertex_rule, VertexRule::Unrestricted);
        assert_eq!(params.seed, None);
    }

    #[test]
    fn builder_sets_fields() {
        let params = RunParams::new(3)
            .with_delay_ms(250)
            .with_vertex_rule(VertexRule::DifferentThanPrevious)
            .with_seed(11);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.delay, Duration::from_millis(250));
        assert_eq!(params.vertex_rule, VertexRule::DifferentThanPrevious);
        assert_eq!(params.seed, Some(11));
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(matches!(
            RunParams::new(0).validate(1),
            Err(Error::InvalidConfig(_))
        ));
        assert!(RunParams::new(1).validate(1).is_ok());
    }

    #[test]
    fn delay_has_no_upper_bound() {
        assert!(RunParams::new(5)
            .with_delay(Duration::from_secs(3600))
            .validate(1)
            .is_ok());
    }

    #[test]
    fn restricted_rule_requires_single_shape() {
        let params = RunParams::new(10).with_vertex_rule(VertexRule::DifferentThanPrevious);
        assert!(params.validate(1).is_ok());
        assert!(matches!(params.validate(2), Err(Error::InvalidConfig(_))));
    }
}
