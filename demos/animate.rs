use grid_astar::{
    CancellationHandle, CellKind, GridEditor, PathfindingEngine, SearchResult, SearchSettings,
    StepObserver,
};
use grid_util::point::Point;
use std::time::Duration;

// Animates a search in the terminal on a 12x7 grid with shape
//  ____________
// |S...#.......|
// |....#..###..|
// |.##.#....#..|
// |..#.####.#..|
// |..#......#.E|
// |..#####..#..|
// |.........#..|
//  ____________
// where
// - # marks a wall
// - o marks a visited cell
// - * marks the final path

struct TerminalCanvas {
    rows: Vec<Vec<char>>,
    frame: usize,
}

impl TerminalCanvas {
    fn draw(&mut self) {
        println!("Frame {}:", self.frame);
        for row in &self.rows {
            println!("{}", row.iter().collect::<String>());
        }
        println!();
        self.frame += 1;
    }
}

impl StepObserver for TerminalCanvas {
    fn on_cell_visited(&mut self, coord: Point, kind: CellKind) {
        if kind == CellKind::Empty {
            self.rows[coord.y as usize][coord.x as usize] = 'o';
        }
        self.draw();
    }

    fn on_path_found(&mut self, path: &[Point]) {
        for p in path {
            self.rows[p.y as usize][p.x as usize] = '*';
        }
        self.draw();
    }
}

fn main() {
    let layout = "S...#.......\n\
                  ....#..###..\n\
                  .##.#....#..\n\
                  ..#.####.#..\n\
                  ..#......#.E\n\
                  ..#####..#..\n\
                  .........#..";
    let mut editor = GridEditor::from_grid(layout.parse().unwrap());
    // Close the gap next to the end with a drag, then reopen one cell of it
    editor
        .paint_stroke((0..3).map(|y| Point::new(10, y + 3)), true)
        .unwrap();
    editor.erase_wall(Point::new(10, 5)).unwrap();

    let grid = editor.begin_search().unwrap();
    let mut canvas = TerminalCanvas {
        rows: grid
            .to_string()
            .lines()
            .map(|l| l.chars().collect())
            .collect(),
        frame: 0,
    };
    let settings = SearchSettings::default().with_step_delay(Duration::from_millis(40));
    let mut engine = PathfindingEngine::new(&grid).unwrap();
    let result = engine
        .run(&mut canvas, &settings, &CancellationHandle::new())
        .unwrap();
    editor.end_search();

    match result {
        SearchResult::Succeeded(path) => {
            println!("Path of {} steps:", path.len() - 1);
            for p in path {
                println!("{:?}", p);
            }
        }
        SearchResult::Exhausted => println!("No path"),
        SearchResult::Cancelled => println!("Cancelled"),
    }
    println!("{:?}", engine.stats());
}
