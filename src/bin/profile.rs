use std::time::{Duration, Instant};

use rand::Rng;

use mazemory::{
    generators::{Generator, generate_maze, get_rng},
    maze::Maze,
    session::{
        memory::VisitMemory, regenerate::rebuild_preserving, visibility::compute_visible_cells,
    },
};

/// Moves to wander before each rebuild, so memory holds remembered and forgotten cells
const WANDER_STEPS: usize = 200;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1000);
    let iters = args
        .next()
        .and_then(|s| s.parse::<u8>().ok())
        .unwrap_or(5)
        .clamp(1, mazemory::config::MAX_ITERS);
    let side = 1u8 << iters;

    let mut rng = get_rng(Some(0));
    let mut maze = Maze::new(side, side);
    generate_maze(&mut maze, Generator::Hilbert, &mut rng);
    let mut memory = VisitMemory::new(side, side, 32);
    let mut pos = (0, 0);
    memory.mark_seen(pos);

    let mut total = Duration::ZERO;
    let mut worst = Duration::ZERO;
    for i in 0..num_iters {
        for _ in 0..WANDER_STEPS {
            let dirs = maze.open_directions(pos).collect::<Vec<_>>();
            let Some(&dir) = dirs.get(rng.random_range(0..dirs.len().max(1))) else {
                break;
            };
            if let Some(next) = maze.neighbor(pos, dir) {
                pos = next;
            }
            memory.advance();
            for c in compute_visible_cells(&maze, pos, 5).iter() {
                memory.mark_seen(c);
            }
        }
        let visible = compute_visible_cells(&maze, pos, 5);

        let start = Instant::now();
        match rebuild_preserving(&maze, &memory, &visible, &mut rng) {
            Ok(rebuilt) => maze = rebuilt,
            Err(e) => {
                tracing::error!("[profile] rebuild {} failed: {}", i, e);
                eprintln!("Rebuild {} failed: {}", i, e);
                std::process::exit(1);
            }
        }
        let elapsed = start.elapsed();
        total += elapsed;
        worst = worst.max(elapsed);
        assert!(maze.is_perfect(), "rebuild {} broke the maze", i);
    }

    let mean = total.checked_div(num_iters as u32).unwrap_or_default();
    tracing::info!(
        "[profile] {} rebuilds of a {}x{} maze: total {:?}, mean {:?}, worst {:?}",
        num_iters,
        side,
        side,
        total,
        mean,
        worst
    );
    println!(
        "{} rebuilds of a {}x{} maze: total {:?}, mean {:?}, worst {:?}",
        num_iters, side, side, total, mean, worst
    );
}
