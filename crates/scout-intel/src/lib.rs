//! scout-intel - schema intelligence for schemascout
//!
//! Everything derived from a reflected schema lives here: column profiling,
//! the FK graph with centrality and subject areas, archetype classification,
//! the optional embedding capability with its semantic index, retrieval,
//! graph expansion, query planning, and the card builder plus store.

pub mod builder;
pub mod classify;
pub mod embed;
pub mod error;
pub mod expand;
pub mod graph;
pub mod ner;
pub mod planner;
pub mod profiler;
pub mod retrieval;
pub mod store;

pub use builder::{BuildCaps, CardBuilder};
pub use embed::{HashEncoder, SemanticIndex, TextEncoder};
pub use error::{BuildError, BuildResult};
pub use expand::{ExpandedTable, GraphExpander};
pub use planner::{PlanRequest, Planner};
pub use retrieval::{RetrievalEngine, RetrievalHit};
pub use store::CardStore;
