// Classification pipeline stages.
//
// Layered: normalization → relationship bucketing (guaranteed) → heuristic
// tagging (allowlists + keywords) → segment resolution (heuristic cascade
// with an external fallback for the undecided remainder).

pub mod allowlist;
pub mod buckets;
pub mod normalize;
pub mod resolver;
pub mod segments;
pub mod tagger;
