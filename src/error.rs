use thiserror::Error;

/// Errors surfaced by the Solr client and the layers built on top of it.
#[derive(Error, Debug)]
pub enum SolrError {
    /// A required setting is missing or invalid.
    #[error("Improper configuration: {0}")]
    Config(String),

    /// The HTTP round-trip itself failed (connection refused, timeout, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Solr returned 404. Escalated rather than swallowed, since it usually
    /// means a wrong core name or a core that was never created.
    #[error("404 Not Found: {url}")]
    NotFound { url: String },

    /// Solr returned a non-success HTTP status.
    #[error("HTTP {status} from Solr: {body}")]
    Http { status: u16, body: String },

    /// Solr returned 200 but reported a failure in its own responseHeader.
    #[error("Solr reported status {status}: {message}")]
    SolrStatus { status: i64, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// An index id or item type was not recognized by the index registry.
    #[error("Unrecognized index target '{0}'")]
    UnknownIndexTarget(String),
}

impl From<serde_json::Error> for SolrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
