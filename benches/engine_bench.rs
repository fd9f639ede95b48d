use criterion::{criterion_group, criterion_main, Criterion};
use grid_astar::{search, CancellationHandle, GridModel, NoopObserver};
use grid_util::point::Point;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;
use std::time::Duration;

fn random_grid(n: usize, rng: &mut StdRng) -> GridModel {
    let mut grid = GridModel::new(n, n);
    for x in 0..n as i32 {
        for y in 0..n as i32 {
            if rng.gen_bool(0.25) {
                grid.set_wall(Point::new(x, y)).unwrap();
            }
        }
    }
    grid.set_start(Point::new(0, 0)).unwrap();
    grid.set_end(Point::new(n as i32 - 1, n as i32 - 1)).unwrap();
    grid
}

fn engine_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let cancel = CancellationHandle::new();
    for n in [16, 32, 64] {
        let grids: Vec<GridModel> = (0..20).map(|_| random_grid(n, &mut rng)).collect();
        c.bench_function(format!("{n}x{n} random grids, 4-grid").as_str(), |b| {
            b.iter(|| {
                for grid in &grids {
                    black_box(search(grid, NoopObserver, Duration::ZERO, &cancel).unwrap());
                }
            })
        });
    }
}

fn open_grid_bench(c: &mut Criterion) {
    let mut grid = GridModel::new(64, 64);
    grid.set_start(Point::new(0, 32)).unwrap();
    grid.set_end(Point::new(63, 32)).unwrap();
    let cancel = CancellationHandle::new();
    c.bench_function("64x64 open grid", |b| {
        b.iter(|| black_box(search(&grid, NoopObserver, Duration::ZERO, &cancel).unwrap()))
    });
}

criterion_group!(benches, engine_bench, open_grid_bench);
criterion_main!(benches);
