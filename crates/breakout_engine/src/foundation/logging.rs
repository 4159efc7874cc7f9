//! Logging utilities and structured logging support

pub use log::LevelFilter;

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A second init (tests, tools embedding the engine) keeps the first logger
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Initialize the logging system with an explicit level, ignoring `RUST_LOG`
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}
