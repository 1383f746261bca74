use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum IamError {
    /// The provider rejected or failed the call. `message` is the SDK error's
    /// own display text; its causes are reachable through the source chain.
    #[error("IAM {operation} failed: {message}")]
    Provider {
        operation: &'static str,
        message: String,
        #[source]
        source: BoxError,
    },

    /// A `ListRoles` response said more pages exist but carried no marker.
    #[error("IAM ListRoles page {page} is truncated but has no marker to continue from")]
    MissingMarker { page: usize },

    #[error("Invalid IAM response: {0}")]
    InvalidResponse(String),
}

impl IamError {
    pub fn provider<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        IamError::Provider {
            operation,
            message: err.to_string(),
            source: Box::new(err),
        }
    }
}
