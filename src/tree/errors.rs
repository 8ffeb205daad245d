use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("could not resolve family endpoint starting from line {line}")]
    UnresolvedFamily { line: usize },

    #[error("oldest ancestor at line {line} has no family endpoint")]
    MissingEndpoint { line: usize },
}
