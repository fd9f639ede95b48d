use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use grid_util::point::Point;
use log::{info, trace, warn};

use crate::astar::{OpenUpdate, SearchContext, SearchNode};
use crate::error::SearchError;
use crate::grid_model::{CellKind, GridModel};
use crate::observer::StepObserver;

/// Lifecycle of a [PathfindingEngine]. `Succeeded`, `Exhausted` and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Succeeded,
    Exhausted,
    Cancelled,
}

impl EngineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EngineState::Succeeded | EngineState::Exhausted | EngineState::Cancelled
        )
    }
}

/// Final outcome of a search. Not finding a path is a regular outcome, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchResult {
    /// The full path from start to end, both included.
    Succeeded(Vec<Point>),
    /// The frontier ran dry without reaching the end.
    Exhausted,
    /// The search was stopped through its [CancellationHandle].
    Cancelled,
}

impl SearchResult {
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchResult::Succeeded(path) => Some(path),
            _ => None,
        }
    }

    pub fn state(&self) -> EngineState {
        match self {
            SearchResult::Succeeded(_) => EngineState::Succeeded,
            SearchResult::Exhausted => EngineState::Exhausted,
            SearchResult::Cancelled => EngineState::Cancelled,
        }
    }
}

/// What a single call to [PathfindingEngine::step] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The given cell was expanded and closed.
    Expanded(Point),
    /// The search reached a terminal state.
    Finished(SearchResult),
}

/// Shared flag used to stop a search from outside. Clones refer to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationHandle(Arc<AtomicBool>);

impl CancellationHandle {
    pub fn new() -> CancellationHandle {
        CancellationHandle::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Pacing of [PathfindingEngine::run]. The default runs without any delay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchSettings {
    /// Pause after every expansion, giving a host time to render it.
    pub step_delay: Duration,
}

impl SearchSettings {
    pub fn with_step_delay(mut self, step_delay: Duration) -> SearchSettings {
        self.step_delay = step_delay;
        self
    }
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells expanded and closed.
    pub expanded: usize,
    /// Cells entered into the open set for the first time.
    pub discovered: usize,
    /// Open entries replaced by a cheaper node.
    pub improved: usize,
}

/// Incremental A* over a borrowed [GridModel]. Each [step](Self::step) expands exactly one cell
/// so a host can animate the search; [run](Self::run) drives it to a terminal state. The grid is
/// borrowed for the whole search, so it cannot be edited while the engine is alive.
#[derive(Debug)]
pub struct PathfindingEngine<'g> {
    grid: &'g GridModel,
    goal: Point,
    context: SearchContext,
    state: EngineState,
    stats: SearchStats,
}

impl<'g> PathfindingEngine<'g> {
    /// Prepares a search from the grid's start to its end, with only the root node open.
    pub fn new(grid: &'g GridModel) -> Result<PathfindingEngine<'g>, SearchError> {
        let (start, goal) = match (grid.start(), grid.end()) {
            (Some(start), Some(goal)) => (start, goal),
            (start, end) => {
                return Err(SearchError::MissingEndpoints {
                    start_set: start.is_some(),
                    end_set: end.is_some(),
                })
            }
        };
        info!("Searching from {} to {}", start, goal);
        Ok(PathfindingEngine {
            grid,
            goal,
            context: SearchContext::new(grid.width(), grid.height(), start),
            state: EngineState::Idle,
            stats: SearchStats::default(),
        })
    }

    pub fn grid(&self) -> &GridModel {
        self.grid
    }
    pub fn state(&self) -> EngineState {
        self.state
    }
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
    pub fn open_len(&self) -> usize {
        self.context.open_len()
    }
    pub fn closed_count(&self) -> usize {
        self.context.closed_count()
    }
    pub fn is_closed(&self, coord: &Point) -> bool {
        self.grid.in_bounds(*coord) && self.context.is_closed(coord)
    }
    /// The best node currently known for an unexpanded cell.
    pub fn open_node(&self, coord: &Point) -> Option<&SearchNode> {
        self.context.open_node(coord)
    }
    /// `g + h` of a node with respect to this search's goal.
    pub fn f_value(&self, node: &SearchNode) -> i32 {
        node.f_value(&self.goal)
    }

    /// Stops a search that has not finished yet. Returns whether the state changed.
    pub fn cancel(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        info!("Search cancelled after {} expansions", self.stats.expanded);
        self.state = EngineState::Cancelled;
        true
    }

    /// Expands the open node with the lowest f-value, or finishes the search if that node is the
    /// end or the open set is empty.
    pub fn step<O: StepObserver>(&mut self, observer: &mut O) -> Result<StepOutcome, SearchError> {
        if self.state.is_terminal() {
            return Err(SearchError::AlreadyFinished(self.state));
        }
        self.state = EngineState::Running;
        let grid = self.grid;

        let Some(id) = self.context.select_min(&self.goal) else {
            warn!(
                "No path to {} after {} expansions",
                self.goal, self.stats.expanded
            );
            self.state = EngineState::Exhausted;
            return Ok(StepOutcome::Finished(SearchResult::Exhausted));
        };
        let location = self.context.node(id).location();
        self.context.take_open(&location);
        let cell = grid.cell(location);

        if cell.kind() == CellKind::End {
            let path = self.context.reverse_path(id);
            let path_cells: Vec<Point> = path
                .iter()
                .copied()
                .filter(|p| grid.cell(*p).kind() == CellKind::Empty)
                .collect();
            observer.on_path_found(&path_cells);
            info!(
                "Found path of {} steps after {} expansions",
                path.len() - 1,
                self.stats.expanded
            );
            self.state = EngineState::Succeeded;
            return Ok(StepOutcome::Finished(SearchResult::Succeeded(path)));
        }

        for &n in cell.neighbours() {
            if self.context.is_closed(&n) || grid.cell(n).kind().is_wall() {
                continue;
            }
            match self.context.offer(n, id, &self.goal) {
                OpenUpdate::Discovered => self.stats.discovered += 1,
                OpenUpdate::Improved => self.stats.improved += 1,
                OpenUpdate::Rejected => {}
            }
        }

        self.context.close(location);
        self.stats.expanded += 1;
        trace!("Expanded {} ({} open)", location, self.context.open_len());
        observer.on_cell_visited(location, cell.kind());
        Ok(StepOutcome::Expanded(location))
    }

    /// Steps until a terminal state is reached. After every expansion the engine sleeps for
    /// `settings.step_delay` and then checks `cancel`.
    pub fn run<O: StepObserver>(
        &mut self,
        mut observer: O,
        settings: &SearchSettings,
        cancel: &CancellationHandle,
    ) -> Result<SearchResult, SearchError> {
        loop {
            if cancel.is_cancelled() {
                self.cancel();
                return Ok(SearchResult::Cancelled);
            }
            if let StepOutcome::Finished(result) = self.step(&mut observer)? {
                return Ok(result);
            }
            if !settings.step_delay.is_zero() {
                thread::sleep(settings.step_delay);
            }
        }
    }
}
