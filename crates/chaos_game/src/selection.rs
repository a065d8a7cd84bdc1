//! Weighted shape selection and uniform vertex picking.
//!
//! [`WeightedSelector`] is built once per session from the shape snapshot. Shapes are
//! ordered by ascending weight and each one owns the half-open interval
//! `(previous cumulative, previous cumulative + weight]`. A roll `r` drawn from
//! `[0, total)` selects the shape owning the first cumulative boundary greater than `r`,
//! so every roll maps to exactly one shape.
//!
//! [`VertexRule`] optionally constrains consecutive vertex picks within a shape.
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::rng::{index, rand01};
use crate::shape::Shape;

/// Cumulative-weight lookup over a shape snapshot.
#[derive(Debug, Clone)]
pub struct WeightedSelector {
    /// Indices into the input shape slice, ordered by ascending weight.
    order: Vec<usize>,
    /// Prefix sums of weights in `order`.
    boundaries: Vec<f64>,
    total: f64,
}

impl WeightedSelector {
    /// Builds the lookup table. Every weight must be finite and strictly positive.
    pub fn new(shapes: &[Shape]) -> Result<Self> {
        if shapes.is_empty() {
            return Err(Error::InvalidConfig(
                "cannot select from an empty shape list".into(),
            ));
        }
        if let Some((shape, s)) = shapes
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.weight().is_finite() && s.weight() > 0.0))
        {
            return Err(Error::InvalidWeight {
                shape,
                weight: s.weight(),
            });
        }

        let mut order: Vec<usize> = (0..shapes.len()).collect();
        // Stable: equal weights keep their insertion order.
        order.sort_by(|&a, &b| shapes[a].weight().total_cmp(&shapes[b].weight()));

        let mut boundaries = Vec::with_capacity(order.len());
        let mut cumulative = 0.0;
        for &i in &order {
            cumulative += shapes[i].weight();
            boundaries.push(cumulative);
        }

        debug!(
            "Weighted selector over {} shapes, total weight {}",
            order.len(),
            cumulative
        );

        Ok(Self {
            order,
            boundaries,
            total: cumulative,
        })
    }

    /// Draws a shape proportionally to its weight, returning its index in the
    /// slice passed to [`WeightedSelector::new`].
    ///
    /// A single shape is returned without consuming randomness.
    pub fn sample(&self, rng: &mut dyn RngCore) -> usize {
        if self.order.len() == 1 {
            return self.order[0];
        }
        let roll = rand01(rng) * self.total;
        self.order[self.slot_for(roll)]
    }

    /// Position in `order` of the first boundary strictly greater than `roll`.
    fn slot_for(&self, roll: f64) -> usize {
        let slot = self.boundaries.partition_point(|&b| b <= roll);
        // Rounding in the prefix sums can leave `roll` at or past the last boundary.
        slot.min(self.boundaries.len() - 1)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Selection probability of the shape at `shape` (index into the input slice).
    pub fn probability(&self, shape: usize) -> Option<f64> {
        let slot = self.order.iter().position(|&i| i == shape)?;
        let lower = if slot == 0 {
            0.0
        } else {
            self.boundaries[slot - 1]
        };
        Some((self.boundaries[slot] - lower) / self.total)
    }
}

/// Constraint on consecutive vertex picks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VertexRule {
    /// Every vertex of the selected shape is equally likely on every step.
    #[default]
    Unrestricted,
    /// Never pick the vertex chosen on the previous step. Only defined for a
    /// single shape.
    DifferentThanPrevious,
}

/// Picks a vertex index of `shape` uniformly at random.
pub fn pick_vertex(shape: &Shape, rng: &mut dyn RngCore) -> usize {
    index(rng, shape.len())
}

/// Picks a vertex index honouring `rule`, given the previously picked index.
///
/// `DifferentThanPrevious` re-rolls until the pick differs; with fewer than two
/// vertices it degrades to an unrestricted pick.
pub fn pick_vertex_with_rule(
    shape: &Shape,
    rule: VertexRule,
    previous: Option<usize>,
    rng: &mut dyn RngCore,
) -> usize {
    let mut pick = pick_vertex(shape, rng);
    if rule == VertexRule::DifferentThanPrevious && shape.len() > 1 {
        while Some(pick) == previous {
            pick = pick_vertex(shape, rng);
        }
    }
    pick
}
