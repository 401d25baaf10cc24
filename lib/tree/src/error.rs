use std::error::Error;

/// An error raised while reshaping solutions into a tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("The variable `{0}` does not describe a valid path")]
    InvalidVariableName(String),
    #[error("The singular path `{path}` has {count} distinct values")]
    MultipleSingularValues { path: String, count: usize },
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}
