//! # Requirements
//!
//! Folds a stream of task demands into the single capacity envelope that a
//! machine must provide to host every one of them.
//!
//! The fold is an elementwise maximum, not a sum: the envelope bounds the
//! worst case in each dimension, since the demands are not assumed to run
//! at the same time in full.
//!
//! `Requirements::add` has no internal synchronization. Producers reporting
//! demands concurrently must funnel them through a single owner.

use serde::{Deserialize, Serialize};

use crate::vector::ResourceVector;

/// The tightest capacity envelope covering every demand seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Requirements {
    /// Elementwise maximum over all folded demands; zero initially.
    pub min: ResourceVector,
}

impl Requirements {
    /// Requirements with no demands folded in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one demand into the envelope, returning the updated value.
    pub fn add(&self, demand: ResourceVector) -> Self {
        let min = self.min.max(&demand);
        if min != self.min {
            tracing::trace!(from = %self.min, to = %min, "requirement envelope grew");
        }
        Self { min }
    }

    /// Fold every demand of `demands`, starting from zero.
    pub fn fold(demands: impl IntoIterator<Item = ResourceVector>) -> Self {
        demands
            .into_iter()
            .fold(Self::new(), |req, demand| req.add(demand))
    }

    /// Whether `capacity` covers the envelope.
    pub fn is_satisfied_by(&self, capacity: &ResourceVector) -> bool {
        capacity.available(&self.min)
    }
}

impl std::fmt::Display for Requirements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "min {}", self.min)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_vector() -> impl Strategy<Value = ResourceVector> {
        (0.0..1e12f64, 0.0..256.0f64, 0.0..1e13f64)
            .prop_map(|(m, c, d)| ResourceVector::new(m, c, d))
    }

    proptest! {
        /// The envelope covers every folded demand.
        #[test]
        fn envelope_covers_all(demands in prop::collection::vec(arb_vector(), 0..16)) {
            let req = Requirements::fold(demands.clone());
            for d in &demands {
                prop_assert!(req.min.available(d));
            }
        }

        /// Fold order does not matter.
        #[test]
        fn fold_order_independent(demands in prop::collection::vec(arb_vector(), 0..16)) {
            let mut reversed = demands.clone();
            reversed.reverse();
            prop_assert_eq!(Requirements::fold(demands), Requirements::fold(reversed));
        }
    }
}
