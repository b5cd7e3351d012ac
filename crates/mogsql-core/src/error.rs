//! Error types for mogsql operations.

use std::fmt;

/// The primary error type for all driver and metadata operations.
#[derive(Debug)]
pub enum Error {
    /// Connection-related errors (connect, authenticate, SSL, disconnect)
    Connection(ConnectionError),
    /// Query execution errors reported by the server
    Query(QueryError),
    /// Type conversion errors while reading a row
    Type(TypeError),
    /// Configuration errors (bad URL, bad option)
    Config(ConfigError),
    /// Bulk copy failed part way through
    Copy(CopyError),
    /// I/O errors
    Io(std::io::Error),
    /// Operation was cancelled via asupersync
    Cancelled,
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    /// SQLSTATE when the server rejected the connection (e.g. `28P01`)
    pub sqlstate: Option<String>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to establish connection
    Connect,
    /// Authentication failed
    Authentication,
    /// Connection lost during operation
    Disconnected,
    /// SSL/TLS negotiation failed
    Ssl,
    /// The server answered the SSL request with a refusal
    SslNotSupported,
    /// Connection refused
    Refused,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub sql: Option<String>,
    pub sqlstate: Option<String>,
    pub severity: Option<String>,
    pub message: String,
    pub detail: Option<String>,
    pub hint: Option<String>,
    pub position: Option<usize>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Syntax error in SQL
    Syntax,
    /// Constraint violation (unique, foreign key, etc.)
    Constraint,
    /// Table or column not found
    NotFound,
    /// Permission denied
    Permission,
    /// Deadlock detected
    Deadlock,
    /// Serialization failure (retry may succeed)
    Serialization,
    /// Statement timeout
    Timeout,
    /// Cancelled
    Cancelled,
    /// Other database error
    Database,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
    pub rust_type: Option<&'static str>,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// A bulk copy failure, tagged with the stage that failed and the number of
/// rows that had been copied before it.
#[derive(Debug)]
pub struct CopyError {
    pub stage: CopyStage,
    pub copied: u64,
    pub source: Box<Error>,
}

/// The step of a bulk copy that produced a [`CopyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStage {
    PrepareColumns,
    QueryColumns,
    FetchColumns,
    Begin,
    Prepare,
    Scan,
    Exec,
    FinalExec,
    Commit,
}

impl CopyStage {
    /// The message prefix reported for this stage.
    pub const fn message(self) -> &'static str {
        match self {
            CopyStage::PrepareColumns => {
                "failed to prepare query to determine target table columns"
            }
            CopyStage::QueryColumns => {
                "failed to execute query to determine target table columns"
            }
            CopyStage::FetchColumns => "failed to fetch target table columns",
            CopyStage::Begin => "failed to begin transaction",
            CopyStage::Prepare => "failed to prepare insert query",
            CopyStage::Scan => "failed to scan row",
            CopyStage::Exec => "failed to exec copy",
            CopyStage::FinalExec => "failed to final exec copy",
            CopyStage::Commit => "failed to commit transaction",
        }
    }
}

impl Error {
    /// Did the server refuse to negotiate SSL?
    pub fn is_ssl_not_supported(&self) -> bool {
        matches!(self, Error::Connection(c) if c.kind == ConnectionErrorKind::SslNotSupported)
    }

    /// Get SQLSTATE if available (e.g., "23505" for unique violation).
    ///
    /// Looks through copy errors to the error that caused them.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Query(q) => q.sqlstate.as_deref(),
            Error::Connection(c) => c.sqlstate.as_deref(),
            Error::Copy(c) => c.source.sqlstate(),
            _ => None,
        }
    }

    /// The server's message, for errors the server itself reported.
    ///
    /// Unlike [`Error::sqlstate`] this does not look inside copy errors, whose
    /// own text carries the failed stage.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Query(q) if q.sqlstate.is_some() => Some(&q.message),
            Error::Connection(c) if c.sqlstate.is_some() => Some(&c.message),
            _ => None,
        }
    }

    /// Rows copied before a bulk copy failed.
    pub fn copied(&self) -> Option<u64> {
        match self {
            Error::Copy(c) => Some(c.copied),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => {
                if let Some(sqlstate) = &e.sqlstate {
                    write!(f, "Query error (SQLSTATE {}): {}", sqlstate, e.message)
                } else {
                    write!(f, "Query error: {}", e.message)
                }
            }
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Copy(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Copy(e) => Some(e.source.as_ref()),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sqlstate) = &self.sqlstate {
            write!(f, "{} (SQLSTATE {})", self.message, sqlstate)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = &self.column {
            write!(
                f,
                "expected {} for column '{}', found {}",
                self.expected, col, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage.message(), self.source)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<CopyError> for Error {
    fn from(err: CopyError) -> Self {
        Error::Copy(err)
    }
}

/// Result type alias for mogsql operations.
pub type Result<T> = std::result::Result<T, Error>;
