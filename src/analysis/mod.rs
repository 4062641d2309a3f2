// Typed per-domain entry points built on the aggregation layer.
//
// Each submodule takes one record type and returns plain serialisable
// summaries; nothing here performs I/O.

pub mod biography;
pub mod external;
pub mod gps;
pub mod injury;
pub mod physical;
pub mod priority;
pub mod recovery;
