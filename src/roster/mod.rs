// Roster snapshots and cross-league aggregation into the rostered-anywhere
// native-ID set.

pub mod aggregate;
pub mod snapshot;
