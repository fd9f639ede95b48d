//! Fuzzes the engine by checking on many random grids that a path is found exactly when the end
//! is reachable, that found paths are valid and as short as a breadth-first search says they
//! should be, and that repeated searches behave identically.
use grid_astar::{
    path_is_contiguous, search, CancellationHandle, CellKind, GridModel, RecordingObserver,
    SearchResult,
};
use grid_util::point::Point;
use rand::prelude::*;
use std::collections::VecDeque;
use std::time::Duration;

fn random_grid(w: usize, h: usize, rng: &mut StdRng, wall_chance: f64) -> GridModel {
    let mut grid = GridModel::new(w, h);
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            if rng.gen_bool(wall_chance) {
                grid.set_wall(Point::new(x, y)).unwrap();
            }
        }
    }
    let start = random_grid_point(&grid, rng);
    let mut end = random_grid_point(&grid, rng);
    while end == start {
        end = random_grid_point(&grid, rng);
    }
    grid.set_start(start).unwrap();
    grid.set_end(end).unwrap();
    grid.update();
    grid
}

fn random_grid_point(grid: &GridModel, rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(0..grid.width()) as i32,
        rng.gen_range(0..grid.height()) as i32,
    )
}

/// Length in moves of the shortest start-end path, if there is one.
fn bfs_distance(grid: &GridModel) -> Option<usize> {
    let start = grid.start()?;
    let end = grid.end()?;
    let mut dist = vec![usize::MAX; grid.width() * grid.height()];
    let ix = |p: Point| p.y as usize * grid.width() + p.x as usize;
    let mut queue = VecDeque::from([start]);
    dist[ix(start)] = 0;
    while let Some(p) = queue.pop_front() {
        if p == end {
            return Some(dist[ix(p)]);
        }
        for &n in grid.cell_at(p).unwrap().neighbours() {
            if !grid.kind_at(n).unwrap().is_wall() && dist[ix(n)] == usize::MAX {
                dist[ix(n)] = dist[ix(p)] + 1;
                queue.push_back(n);
            }
        }
    }
    None
}

fn run(grid: &GridModel) -> (SearchResult, RecordingObserver) {
    let mut recorder = RecordingObserver::new();
    let result = search(grid, &mut recorder, Duration::ZERO, &CancellationHandle::new()).unwrap();
    (result, recorder)
}

#[test]
fn fuzz() {
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for i in 0..N_GRIDS {
        let (w, h) = (rng.gen_range(1..12), rng.gen_range(2..12));
        let grid = random_grid(w, h, &mut rng, 0.35);
        let start = grid.start().unwrap();
        let end = grid.end().unwrap();
        let (result, recorder) = run(&grid);
        let expected = bfs_distance(&grid);
        // Show the grid if the outcome is wrong
        if result.path().map(|p| p.len() - 1) != expected {
            println!("Grid {i}:\n{grid}");
        }
        assert_eq!(result.path().map(|p| p.len() - 1), expected);
        assert_eq!(
            grid.reachable(start, end),
            matches!(result, SearchResult::Succeeded(_))
        );

        let mut visited = recorder.visited_coords();
        assert!(visited.len() <= w * h);
        visited.sort_by_key(|p| (p.y, p.x));
        visited.dedup();
        assert_eq!(visited.len(), recorder.visited.len());
        assert!(recorder
            .visited
            .iter()
            .all(|(p, kind)| *kind != CellKind::Wall && *p != end));

        match &result {
            SearchResult::Succeeded(path) => {
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&end));
                assert!(path_is_contiguous(path));
                assert!(path
                    .iter()
                    .all(|p| !grid.kind_at(*p).unwrap().is_wall()));
                assert_eq!(recorder.path.as_ref().map(Vec::len), Some(path.len() - 2));
            }
            SearchResult::Exhausted => assert!(recorder.path.is_none()),
            SearchResult::Cancelled => panic!("search was never cancelled"),
        }
    }
}

#[test]
fn fuzz_open_grids() {
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..N_GRIDS {
        let (w, h) = (rng.gen_range(2..16), rng.gen_range(1..16));
        let grid = random_grid(w, h, &mut rng, 0.0);
        let start = grid.start().unwrap();
        let end = grid.end().unwrap();
        let (result, _) = run(&grid);
        let path = result.path().unwrap();
        assert_eq!(path.len() as i32 - 1, start.manhattan_distance(&end));
    }
}

#[test]
fn fuzz_determinism() {
    const N_GRIDS: usize = 300;
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..N_GRIDS {
        let grid = random_grid(10, 10, &mut rng, 0.3);
        assert_eq!(run(&grid), run(&grid.clone()));
    }
}
