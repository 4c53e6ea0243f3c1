use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a file from being read or written as a whole.
/// Line-level problems never surface here, see [`crate::csv_handler::SkippedLine`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("no products could be loaded from {}; run generate_fixtures first", .0.display())]
    EmptyCatalog(PathBuf),
    #[error("no salesmen could be loaded from {}; run generate_fixtures first", .0.display())]
    EmptyRoster(PathBuf),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
