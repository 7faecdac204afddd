use fd_core::Point;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: Point, to: Point },

    #[error("navigation graph has no nodes")]
    EmptyGraph,

    #[error("location code {0:?} already registered")]
    DuplicateCode(String),
}

pub type NavResult<T> = Result<T, NavError>;
