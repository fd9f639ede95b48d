use core::fmt;
use grid_util::point::Point;

use crate::engine::EngineState;
use crate::grid_model::CellKind;

/// Errors raised while building or editing a [GridModel](crate::grid_model::GridModel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside `[0, width) x [0, height)`.
    OutOfBounds {
        coord: Point,
        width: usize,
        height: usize,
    },
    /// An unknown character was found while parsing an ASCII grid.
    Parse {
        line: usize,
        column: usize,
        found: char,
    },
    /// A second start or end marker was found while parsing.
    DuplicateEndpoint(CellKind),
    /// Rows of an ASCII grid differ in length, or the grid is empty.
    Ragged,
    /// Edits are rejected while a search holds the grid.
    SearchRunning,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                coord,
                width,
                height,
            } => write!(f, "{} lies outside the {}x{} grid", coord, width, height),
            GridError::Parse {
                line,
                column,
                found,
            } => write!(
                f,
                "unexpected character {:?} at line {}, column {}",
                found, line, column
            ),
            GridError::DuplicateEndpoint(kind) => {
                write!(f, "grid contains more than one {:?} cell", kind)
            }
            GridError::Ragged => write!(f, "grid rows are empty or of unequal length"),
            GridError::SearchRunning => write!(f, "grid cannot be edited while a search is running"),
        }
    }
}

impl std::error::Error for GridError {}

/// Errors raised by the [PathfindingEngine](crate::engine::PathfindingEngine). Failing to find a
/// path is not one of them, see [SearchResult](crate::engine::SearchResult).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// A search was requested on a grid without both a start and an end.
    MissingEndpoints { start_set: bool, end_set: bool },
    /// The engine already reached a terminal state.
    AlreadyFinished(EngineState),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::MissingEndpoints { start_set, end_set } => write!(
                f,
                "search needs both endpoints (start set: {}, end set: {})",
                start_set, end_set
            ),
            SearchError::AlreadyFinished(state) => {
                write!(f, "search already finished in state {:?}", state)
            }
        }
    }
}

impl std::error::Error for SearchError {}
