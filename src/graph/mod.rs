//! BEL graph: a directed multigraph of canonical nodes and provenance-carrying
//! edges.
//!
//! - [`index::BelGraph`]: the `petgraph`-backed container with a
//!   [`NodeId`](crate::canonical::NodeId) → `NodeIndex` lookup
//! - [`edge`]: edge payloads and their provenance keys
//! - [`traverse`]: direct children along `isA` and other hierarchy relations

pub mod edge;
pub mod index;
pub mod traverse;

pub use edge::{EdgeData, EdgeRecord};
pub use index::{BelGraph, GraphResult, NodeRecord};
