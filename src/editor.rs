use grid_util::point::Point;
use log::info;

use crate::error::GridError;
use crate::grid_model::GridModel;

/// Host-side editing facade around a [GridModel]. Mirrors what a pointer-driven editor does
/// (drag to paint or erase walls, place the endpoints) and refuses every edit while a search is
/// running on a snapshot handed out by [begin_search](Self::begin_search).
#[derive(Clone, Debug)]
pub struct GridEditor {
    grid: GridModel,
    search_running: bool,
}

impl GridEditor {
    pub fn new(width: usize, height: usize) -> GridEditor {
        GridEditor::from_grid(GridModel::new(width, height))
    }

    pub fn from_grid(grid: GridModel) -> GridEditor {
        GridEditor {
            grid,
            search_running: false,
        }
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn is_search_running(&self) -> bool {
        self.search_running
    }

    fn editable(&mut self) -> Result<&mut GridModel, GridError> {
        if self.search_running {
            Err(GridError::SearchRunning)
        } else {
            Ok(&mut self.grid)
        }
    }

    pub fn paint_wall(&mut self, coord: Point) -> Result<(), GridError> {
        self.editable()?.set_wall(coord)
    }

    pub fn erase_wall(&mut self, coord: Point) -> Result<(), GridError> {
        self.editable()?.clear_wall(coord)
    }

    /// Applies a pointer drag: every coordinate is painted (`wall = true`) or erased. Stops at
    /// the first coordinate outside the grid.
    pub fn paint_stroke<I>(&mut self, stroke: I, wall: bool) -> Result<(), GridError>
    where
        I: IntoIterator<Item = Point>,
    {
        let grid = self.editable()?;
        for p in stroke {
            if wall {
                grid.set_wall(p)?;
            } else {
                grid.clear_wall(p)?;
            }
        }
        Ok(())
    }

    pub fn place_start(&mut self, coord: Point) -> Result<(), GridError> {
        self.editable()?.set_start(coord)
    }

    pub fn place_end(&mut self, coord: Point) -> Result<(), GridError> {
        self.editable()?.set_end(coord)
    }

    pub fn clear_start(&mut self) -> Result<(), GridError> {
        self.editable()?.clear_start();
        Ok(())
    }

    pub fn clear_end(&mut self) -> Result<(), GridError> {
        self.editable()?.clear_end();
        Ok(())
    }

    pub fn clear_walls(&mut self) -> Result<(), GridError> {
        self.editable()?.clear_walls();
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), GridError> {
        self.editable()?.reset();
        Ok(())
    }

    /// Locks the editor and returns a snapshot of the grid to search on, with up to date
    /// components.
    pub fn begin_search(&mut self) -> Result<GridModel, GridError> {
        let grid = self.editable()?;
        grid.update();
        let snapshot = grid.clone();
        self.search_running = true;
        info!("Editor locked for search");
        Ok(snapshot)
    }

    /// Unlocks the editor once the search on the snapshot has finished or was cancelled.
    pub fn end_search(&mut self) {
        if self.search_running {
            info!("Editor unlocked");
        }
        self.search_running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CancellationHandle, SearchResult};
    use crate::observer::NoopObserver;
    use crate::search;
    use std::time::Duration;

    #[test]
    fn stroke_paints_and_erases() {
        let mut editor = GridEditor::new(4, 2);
        let stroke = (0..4).map(|x| Point::new(x, 1));
        editor.paint_stroke(stroke, true).unwrap();
        assert_eq!(editor.grid().to_string(), "....\n####\n");
        editor
            .paint_stroke([Point::new(1, 1), Point::new(2, 1)], false)
            .unwrap();
        assert_eq!(editor.grid().to_string(), "....\n#..#\n");
        assert!(editor
            .paint_stroke([Point::new(0, 0), Point::new(9, 0)], true)
            .is_err());
    }

    #[test]
    fn edits_are_locked_while_searching() {
        let mut editor = GridEditor::new(3, 1);
        editor.place_start(Point::new(0, 0)).unwrap();
        editor.place_end(Point::new(2, 0)).unwrap();
        let snapshot = editor.begin_search().unwrap();
        assert!(editor.is_search_running());
        assert_eq!(
            editor.paint_wall(Point::new(1, 0)),
            Err(GridError::SearchRunning)
        );
        assert_eq!(editor.reset(), Err(GridError::SearchRunning));
        assert!(editor.begin_search().is_err());

        let result = search(&snapshot, NoopObserver, Duration::ZERO, &CancellationHandle::new())
            .unwrap();
        assert_eq!(result.path().map(|p| p.len()), Some(3));
        editor.end_search();

        editor.paint_wall(Point::new(1, 0)).unwrap();
        let blocked = editor.begin_search().unwrap();
        assert!(!blocked.reachable(Point::new(0, 0), Point::new(2, 0)));
        let result = search(&blocked, NoopObserver, Duration::ZERO, &CancellationHandle::new())
            .unwrap();
        assert_eq!(result, SearchResult::Exhausted);
    }
}
