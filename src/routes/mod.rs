//! Route table construction: flattening declared handlers, generating model CRUD routes and per-URL summaries.

pub mod flatten;
pub mod model;
pub mod summary;

pub use flatten::{dedupe_routes, flatten_service};
pub use model::{model_routes, model_segment};
pub use summary::{build_summaries, summary_routes, SchemaSummary};
