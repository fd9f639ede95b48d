//! # grid_astar
//!
//! Observable, incremental [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on a
//! 4-connected grid with unit move costs. A [GridModel] holds walls and the start and end
//! points, a [PathfindingEngine] expands one cell at a time and reports every expansion and the
//! final path to a [StepObserver], which is where a host does its drawing.
//!
//! The open set is scanned in insertion order and the first node with the lowest
//! `f = g + h` is expanded, with `h` the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) to the end. This makes
//! the expansion order, and hence the animation, fully reproducible.
//!
//! ```
//! use grid_astar::{search, CancellationHandle, GridModel, NoopObserver};
//! use std::time::Duration;
//!
//! let grid: GridModel = "S#E\n.#.\n...".parse().unwrap();
//! let result = search(&grid, NoopObserver, Duration::ZERO, &CancellationHandle::new()).unwrap();
//! assert_eq!(result.path().unwrap().len(), 7);
//! ```
pub mod astar;
pub mod editor;
pub mod engine;
pub mod error;
pub mod grid_model;
pub mod observer;

use std::time::Duration;

use grid_util::point::Point;
use itertools::Itertools;

pub use crate::editor::GridEditor;
pub use crate::engine::{
    CancellationHandle, EngineState, PathfindingEngine, SearchResult, SearchSettings, SearchStats,
    StepOutcome,
};
pub use crate::error::{GridError, SearchError};
pub use crate::grid_model::{Cell, CellKind, GridModel};
pub use crate::observer::{NoopObserver, RecordingObserver, StepObserver};

/// Cost of moving to a horizontally or vertically adjacent cell.
pub const UNIT_COST: i32 = 1;

/// Runs a complete search on `grid`, pausing `step_delay` after each expansion and checking
/// `cancel_token` before each one. Fails only if the grid lacks a start or an end.
pub fn search<O: StepObserver>(
    grid: &GridModel,
    observer: O,
    step_delay: Duration,
    cancel_token: &CancellationHandle,
) -> Result<SearchResult, SearchError> {
    let settings = SearchSettings::default().with_step_delay(step_delay);
    PathfindingEngine::new(grid)?.run(observer, &settings, cancel_token)
}

/// Checks that every consecutive pair of points differs by one unit along exactly one axis.
pub fn path_is_contiguous(path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| a.manhattan_distance(b) == 1)
}
