use thiserror::Error;

/// Why `Worker::try_accept` turned a task down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("worker is charging")]
    Charging,

    #[error("task queue is full")]
    QueueFull,

    #[error("no route to the task origin")]
    NoRoute,
}

/// Why `Worker::begin_charging` was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ChargeError {
    #[error("worker has queued or executing tasks")]
    HasWork,
}
