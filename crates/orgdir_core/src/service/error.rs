//! Query outcome taxonomy shared by directory services.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type QueryResult<T> = Result<T, QueryError>;

/// Failure outcomes surfaced to transport/boundary layers.
#[derive(Debug)]
pub enum QueryError {
    /// Query ran successfully but matched nothing.
    NotFound(String),
    /// Storage access failed while running `operation`.
    Execution {
        operation: &'static str,
        message: String,
        source: RepoError,
    },
}

impl QueryError {
    pub(crate) fn execution(
        operation: &'static str,
        message: impl Into<String>,
        source: RepoError,
    ) -> Self {
        Self::Execution {
            operation,
            message: message.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Execution {
                message, source, ..
            } => write!(f, "{message}: {source}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Execution { source, .. } => Some(source),
        }
    }
}
