use fd_sequencer::SequenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("schedule error: {0}")]
    Schedule(#[from] SequenceError),
}

pub type SimResult<T> = Result<T, SimError>;
