use core::fmt;
use std::str::FromStr;

use grid_util::point::Point;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::GridError;

/// What occupies a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Wall,
    Start,
    End,
}

impl CellKind {
    /// Character used by the ASCII format of [GridModel].
    pub fn symbol(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => '#',
            CellKind::Start => 'S',
            CellKind::End => 'E',
        }
    }

    pub fn from_symbol(c: char) -> Option<CellKind> {
        match c {
            '.' => Some(CellKind::Empty),
            '#' => Some(CellKind::Wall),
            'S' => Some(CellKind::Start),
            'E' => Some(CellKind::End),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        self == CellKind::Wall
    }
}

/// A single location on the grid together with its in-bounds 4-neighbourhood, which is fixed
/// when the grid is built.
#[derive(Clone, Debug)]
pub struct Cell {
    kind: CellKind,
    coord: Point,
    neighbours: SmallVec<[Point; 4]>,
}

impl Cell {
    pub fn kind(&self) -> CellKind {
        self.kind
    }
    pub fn coord(&self) -> Point {
        self.coord
    }
    /// Neighbours in up, down, left, right order, omitting those outside the grid.
    pub fn neighbours(&self) -> &[Point] {
        &self.neighbours
    }
}

/// [GridModel] holds the cells of a `width x height` grid along with the optional start and end
/// points. At most one cell is [CellKind::Start] and at most one is [CellKind::End]; neither is
/// ever a wall. Connected components of the non-wall cells are tracked with a [UnionFind] so a
/// host can cheaply ask whether the end can be reached at all.
#[derive(Clone, Debug)]
pub struct GridModel {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl GridModel {
    /// Builds an empty grid and precomputes the neighbour list of every cell.
    pub fn new(width: usize, height: usize) -> GridModel {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let coord = Point::new(x, y);
                let neighbours = [
                    Point::new(x, y - 1),
                    Point::new(x, y + 1),
                    Point::new(x - 1, y),
                    Point::new(x + 1, y),
                ]
                .into_iter()
                .filter(|p| p.x >= 0 && p.y >= 0 && (p.x as usize) < width && (p.y as usize) < height)
                .collect();
                cells.push(Cell {
                    kind: CellKind::Empty,
                    coord,
                    neighbours,
                });
            }
        }
        let mut grid = GridModel {
            width,
            height,
            cells,
            start: None,
            end: None,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn in_bounds(&self, coord: Point) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    fn index_of(&self, coord: Point) -> Result<usize, GridError> {
        if self.in_bounds(coord) {
            Ok(coord.y as usize * self.width + coord.x as usize)
        } else {
            Err(GridError::OutOfBounds {
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn cell_at(&self, coord: Point) -> Result<&Cell, GridError> {
        self.index_of(coord).map(|ix| &self.cells[ix])
    }

    /// Cell lookup for coordinates known to be in bounds, such as those taken from neighbour
    /// lists. Panics otherwise.
    pub(crate) fn cell(&self, coord: Point) -> &Cell {
        debug_assert!(self.in_bounds(coord));
        &self.cells[coord.y as usize * self.width + coord.x as usize]
    }

    pub fn kind_at(&self, coord: Point) -> Result<CellKind, GridError> {
        self.cell_at(coord).map(Cell::kind)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    fn is_endpoint(&self, coord: Point) -> bool {
        self.start == Some(coord) || self.end == Some(coord)
    }

    /// Turns the cell into a wall. Does nothing when the cell is the start or the end.
    pub fn set_wall(&mut self, coord: Point) -> Result<(), GridError> {
        let ix = self.index_of(coord)?;
        if self.is_endpoint(coord) || self.cells[ix].kind.is_wall() {
            return Ok(());
        }
        self.cells[ix].kind = CellKind::Wall;
        // Blocking a cell can split a component, which a union-find cannot undo
        self.components_dirty = true;
        Ok(())
    }

    /// Removes a wall. Does nothing when the cell is the start or the end.
    pub fn clear_wall(&mut self, coord: Point) -> Result<(), GridError> {
        let ix = self.index_of(coord)?;
        if self.is_endpoint(coord) || !self.cells[ix].kind.is_wall() {
            return Ok(());
        }
        self.open_cell(ix, CellKind::Empty);
        Ok(())
    }

    /// Marks `coord` as the start. A wall at `coord` is removed, the previous start cell becomes
    /// empty, and if `coord` was the end, the end is cleared.
    pub fn set_start(&mut self, coord: Point) -> Result<(), GridError> {
        let ix = self.index_of(coord)?;
        if self.end == Some(coord) {
            self.end = None;
        }
        if let Some(old) = self.start.take() {
            let old_ix = self.index_of(old)?;
            self.cells[old_ix].kind = CellKind::Empty;
        }
        self.open_cell(ix, CellKind::Start);
        self.start = Some(coord);
        Ok(())
    }

    /// Marks `coord` as the end, mirroring [set_start](Self::set_start).
    pub fn set_end(&mut self, coord: Point) -> Result<(), GridError> {
        let ix = self.index_of(coord)?;
        if self.start == Some(coord) {
            self.start = None;
        }
        if let Some(old) = self.end.take() {
            let old_ix = self.index_of(old)?;
            self.cells[old_ix].kind = CellKind::Empty;
        }
        self.open_cell(ix, CellKind::End);
        self.end = Some(coord);
        Ok(())
    }

    pub fn clear_start(&mut self) {
        if let Some(start) = self.start.take() {
            let ix = start.y as usize * self.width + start.x as usize;
            self.cells[ix].kind = CellKind::Empty;
        }
    }

    pub fn clear_end(&mut self) {
        if let Some(end) = self.end.take() {
            let ix = end.y as usize * self.width + end.x as usize;
            self.cells[ix].kind = CellKind::Empty;
        }
    }

    /// Removes every wall, keeping the endpoints.
    pub fn clear_walls(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.kind.is_wall()) {
            cell.kind = CellKind::Empty;
        }
        self.generate_components();
    }

    /// Returns the grid to its freshly built state.
    pub fn reset(&mut self) {
        self.clear_start();
        self.clear_end();
        self.clear_walls();
    }

    /// Assigns a non-wall kind to the cell at `ix` and joins it with its open neighbours.
    fn open_cell(&mut self, ix: usize, kind: CellKind) {
        let was_wall = self.cells[ix].kind.is_wall();
        self.cells[ix].kind = kind;
        if was_wall && !self.components_dirty {
            for n in self.cells[ix].neighbours.clone() {
                let n_ix = n.y as usize * self.width + n.x as usize;
                if !self.cells[n_ix].kind.is_wall() {
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open grid neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        for (ix, cell) in self.cells.iter().enumerate() {
            if cell.kind.is_wall() {
                continue;
            }
            // Linking down and right is enough to cover every edge once
            let x = cell.coord.x;
            let y = cell.coord.y;
            for n in [Point::new(x, y + 1), Point::new(x + 1, y)] {
                if self.in_bounds(n) {
                    let n_ix = n.y as usize * self.width + n.x as usize;
                    if !self.cells[n_ix].kind.is_wall() {
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }

    /// Checks whether `a` and `b` lie on the same connected component. Walls and out-of-bounds
    /// points are never reachable. Placing walls only marks the components as dirty, so call
    /// [update](Self::update) first after adding walls.
    pub fn reachable(&self, a: Point, b: Point) -> bool {
        match (self.cell_at(a), self.cell_at(b)) {
            (Ok(ca), Ok(cb)) if !ca.kind.is_wall() && !cb.kind.is_wall() => {
                let a_ix = a.y as usize * self.width + a.x as usize;
                let b_ix = b.y as usize * self.width + b.x as usize;
                self.components.equiv(a_ix, b_ix)
            }
            _ => false,
        }
    }

    /// Whether the components have to be regenerated before [reachable](Self::reachable) can be
    /// trusted.
    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }
}

impl FromStr for GridModel {
    type Err = GridError;

    /// Parses a grid drawn with `.` (empty), `#` (wall), `S` (start) and `E` (end). The first
    /// line is row `y = 0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 || rows.iter().any(|r| r.chars().count() != width) {
            return Err(GridError::Ragged);
        }
        let mut grid = GridModel::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let kind = CellKind::from_symbol(c).ok_or(GridError::Parse {
                    line: y + 1,
                    column: x + 1,
                    found: c,
                })?;
                let p = Point::new(x as i32, y as i32);
                match kind {
                    CellKind::Empty => {}
                    CellKind::Wall => grid.set_wall(p)?,
                    CellKind::Start if grid.start.is_some() => {
                        return Err(GridError::DuplicateEndpoint(CellKind::Start))
                    }
                    CellKind::Start => grid.set_start(p)?,
                    CellKind::End if grid.end.is_some() => {
                        return Err(GridError::DuplicateEndpoint(CellKind::End))
                    }
                    CellKind::End => grid.set_end(p)?,
                }
            }
        }
        grid.update();
        info!("Parsed {}x{} grid", grid.width, grid.height);
        Ok(grid)
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|c| c.kind.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
