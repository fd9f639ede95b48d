use grid_util::point::Point;

use crate::grid_model::CellKind;

/// Receives progress notifications from a running search. The engine never draws anything, a
/// host implements this to colour cells. Both methods default to doing nothing.
pub trait StepObserver {
    /// Called once per expansion, in expansion order, after `coord` has been closed. `kind` is
    /// the cell's type: only [CellKind::Empty] cells are meant to be recoloured as visited.
    fn on_cell_visited(&mut self, _coord: Point, _kind: CellKind) {}

    /// Called once when a path was found, with the empty cells along it in start-to-end order.
    /// The start and end cells are left out.
    fn on_path_found(&mut self, _path: &[Point]) {}
}

/// Observer that ignores every notification, for headless searches.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {}

/// Observer that keeps every notification it receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingObserver {
    pub visited: Vec<(Point, CellKind)>,
    pub path: Option<Vec<Point>>,
}

impl RecordingObserver {
    pub fn new() -> RecordingObserver {
        RecordingObserver::default()
    }

    /// Visited coordinates without their kinds.
    pub fn visited_coords(&self) -> Vec<Point> {
        self.visited.iter().map(|(p, _)| *p).collect()
    }
}

impl StepObserver for RecordingObserver {
    fn on_cell_visited(&mut self, coord: Point, kind: CellKind) {
        self.visited.push((coord, kind));
    }

    fn on_path_found(&mut self, path: &[Point]) {
        self.path = Some(path.to_vec());
    }
}

impl<O: StepObserver + ?Sized> StepObserver for &mut O {
    fn on_cell_visited(&mut self, coord: Point, kind: CellKind) {
        (**self).on_cell_visited(coord, kind)
    }

    fn on_path_found(&mut self, path: &[Point]) {
        (**self).on_path_found(path)
    }
}
