pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("cannot connect to database: {0}")]
    Connection(#[source] BoxError),
    #[error("cannot query: {0}")]
    Query(#[source] BoxError),
    #[error("cannot scan query: {0}")]
    Scan(#[source] BoxError),
    #[error("cannot scan query: expected {expected} columns, query returned {actual}")]
    ColumnCount { expected: usize, actual: usize },
    #[error("cannot write line: {0}")]
    Write(#[from] csv::Error),
}

impl ReportError {
    pub fn connection(e: impl Into<BoxError>) -> Self {
        ReportError::Connection(e.into())
    }

    pub fn query(e: impl Into<BoxError>) -> Self {
        ReportError::Query(e.into())
    }

    pub fn scan(e: impl Into<BoxError>) -> Self {
        ReportError::Scan(e.into())
    }
}
