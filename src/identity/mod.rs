// Cross-provider identity reconciliation: name normalization and two-tier
// foreign-to-native ID resolution.

pub mod normalize;
pub mod resolver;
