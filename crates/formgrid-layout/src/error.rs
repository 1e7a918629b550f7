//! Error types for the fallible edges of the engine.
//!
//! Grid validation itself never fails; these errors come from loading
//! configuration and from structural checks on the vertical cell graph.

use thiserror::Error;

use crate::vertical::CellId;

/// Failure loading a [`BodyGridConfig`](crate::config::BodyGridConfig).
#[derive(Debug, Error)]
pub enum GridConfigError {
    #[error("failed to parse body grid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("default column count must be at least 1")]
    ZeroColumnCount,
}

/// A broken invariant in a vertical cell graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridStructureError {
    #[error("cell {} is reachable from itself", cell.index())]
    Cycle { cell: CellId },

    #[error("cell {} is not reachable from the main chain", cell.index())]
    Unreachable { cell: CellId },

    #[error("cell {} is linked from more than one neighbour", cell.index())]
    SharedCell { cell: CellId },

    #[error("cell {} has an up link that does not match its parent", cell.index())]
    BrokenUpLink { cell: CellId },

    #[error("cell {} does not belong to this arena", cell.index())]
    Dangling { cell: CellId },
}
