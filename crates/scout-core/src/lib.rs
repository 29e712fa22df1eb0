//! scout-core - data model for schemascout
//!
//! This crate defines the shared vocabulary of the service: the schema card
//! and its profiles, column roles and table archetypes, the typed results
//! returned by the planning and execution tools, the structured error
//! taxonomy, tokenization helpers, and content fingerprints used as cache
//! keys. It has no database or transport dependencies.

pub mod card;
pub mod config;
pub mod error;
pub mod execute;
pub mod fingerprint;
pub mod key;
pub mod plan;
pub mod raw;
pub mod roles;
pub mod testing;
pub mod text;

pub use card::{BuildMeta, ColumnProfile, FkRef, SchemaCard, SubjectArea, TableProfile};
pub use config::{ExpanderKind, ExplorerConfig, PlanBudget};
pub use error::CoreError;
pub use execute::{
    ErrorCategory, ErrorCode, ExecuteResult, ExecuteStatus, NextAction, ResultColumn, ToolError,
};
pub use key::TableKey;
pub use plan::{
    Clarification, ClarificationCode, ColumnInfo, DatabaseOverview, ExpansionOrigin,
    FilterCandidate, InitPhase, InitStatus, JoinEdge, PlanResult, PredicateShape, RankedTable,
    RelationshipInfo, ScoreComponents, SelectedColumn, SubjectAreaItem, TableColumnHit, TableHit,
    TableInfo,
};
pub use raw::{RawColumn, RawFk, RawSchema, RawTable};
pub use roles::{ColumnRole, RetrievalApproach, SampledState, TableArchetype};
