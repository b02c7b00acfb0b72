use thiserror::Error;

/// Errors raised while configuring or launching a sieve run.
///
/// Marking and counting never fail; running out of memory for the bit
/// array aborts the process through the global allocator.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("bound must be an integer greater than 1, got {bound}")]
    InvalidBound { bound: usize },

    #[error("worker count must be at least 1, got {workers}")]
    InvalidWorkers { workers: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SieveError>;
