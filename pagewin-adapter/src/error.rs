use snafu::Snafu;

/// Errors a data provider may return. Any error type works; it is boxed at the boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Recoverable failures surfaced by the adapter.
///
/// Contract violations (malformed ranges, invalid options passed to a panicking constructor) are
/// not represented here: they panic.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Window options that would make the window thrash.
    #[snafu(display(
        "invalid window options: chunk size {chunk_size} must be in 1..{max_window_size} and cover the look-behind of {look_behind}"
    ))]
    Capacity {
        chunk_size: usize,
        max_window_size: usize,
        look_behind: usize,
    },

    /// The data provider returned an error.
    #[snafu(display("data provider failed: {source}"))]
    Provider { source: BoxError },

    /// The data provider panicked while fetching.
    #[snafu(display("fetch worker panicked: {message}"))]
    WorkerPanicked { message: String },

    /// The executor could not start a fetch.
    #[snafu(display("failed to spawn fetch worker: {source}"))]
    Spawn { source: std::io::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
