use thiserror::Error;

#[derive(Debug, Error)]
pub enum SequenceError {
    /// The source was readable but no row survived parsing.
    #[error("schedule contains no valid rows")]
    NoEvents,

    /// `begin()`/`reload()` called before a successful `load`.
    #[error("no schedule loaded")]
    NotLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SequenceResult<T> = Result<T, SequenceError>;
