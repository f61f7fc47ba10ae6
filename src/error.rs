use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarsError {
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("Invalid family list: {0}")]
    InvalidFamilies(String),

    #[error("Table '{table}' has no column family '{family}'")]
    UnknownFamily { table: String, family: String },

    #[error("Invalid column '{0}', expected 'family:qualifier'")]
    InvalidColumn(String),

    #[error("Invalid row key '{0}'")]
    InvalidRowKey(String),

    // Cell-level read errors, always attributed to the row they came from
    #[error("Row '{row}' has no cell '{column}'")]
    MissingCell { row: String, column: String },

    #[error("Row '{row}' cell '{column}' is not valid UTF-8")]
    InvalidEncoding { row: String, column: String },

    #[error("Row '{row}' cell '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: String,
        column: String,
        value: String,
    },

    // Load errors
    #[error("Malformed CSV row {index}: {source}")]
    MalformedRow {
        index: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type CarsResult<T> = Result<T, CarsError>;

impl From<rocksdb::Error> for CarsError {
    fn from(err: rocksdb::Error) -> Self {
        CarsError::InternalError(err.into())
    }
}

impl CarsError {
    /// Row key the error is attributed to, for cell-level read errors
    pub fn row(&self) -> Option<&str> {
        match self {
            CarsError::MissingCell { row, .. }
            | CarsError::InvalidEncoding { row, .. }
            | CarsError::InvalidValue { row, .. } => Some(row),
            _ => None,
        }
    }
}
