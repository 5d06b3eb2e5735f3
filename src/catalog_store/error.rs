use std::time::Duration;
use thiserror::Error;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A limit, offset, page or id that cannot be used to build a query.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{context}: {source}")]
    QueryFailure {
        context: String,
        #[source]
        source: BoxedError,
    },

    #[error("Query did not complete within {0:?}")]
    DeadlineExceeded(Duration),
}

impl CatalogError {
    pub fn query<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxedError>,
    {
        CatalogError::QueryFailure {
            context: context.into(),
            source: source.into(),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
