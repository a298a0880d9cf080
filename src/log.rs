use std::{io::Write, time::Instant};

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Builds a logger printing `[elapsed level] message` lines to stderr,
/// keeping stdout free for solution output. Safe to call multiple times;
/// only the first installation wins.
pub fn build_solver_logger_for_level(level: LevelFilter) {
    let start = Instant::now();

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .target(Target::Stderr)
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:>9.3}s {:>5}] {}",
                start.elapsed().as_secs_f64(),
                record.level(),
                record.args()
            )
        });

    // tests and repeated calls must not panic on the second installation
    let _ = builder.try_init();
}

pub fn build_solver_logger() {
    build_solver_logger_for_level(LevelFilter::Info);
}
