use thiserror::Error;
use tokenops_blockchain::{BlockchainError, RevertReason};
use tokenops_domain::ChainId;
use tokenops_repository::RepositoryError;

/// Failure taxonomy of the token operations surfaced to callers.
#[derive(Error, Debug)]
pub(crate) enum OrchestratorError {
    #[error("{0}")]
    NotFound(String),

    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(ChainId),

    #[error("{0}")]
    MisconfiguredAccount(String),

    /// Unknown function, malformed argument or unusable template.
    #[error("{0}")]
    InvalidCall(String),

    #[error("{0}")]
    SimulationRejected(RevertReason),

    #[error("{message}")]
    SubmissionFailed { message: String },

    #[error("{0}")]
    ReadFailed(String),

    #[error("Confirmation required. Send {{ confirmation: '{expected}' }}")]
    ConfirmationRequired { expected: &'static str },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl OrchestratorError {
    pub(crate) fn deployment_not_found() -> Self {
        Self::NotFound("Deployment not found".to_string())
    }

    pub(crate) fn template_not_found() -> Self {
        Self::NotFound("Token contract not found".to_string())
    }

    /// Maps errors raised while building a chain client for a request.
    pub(crate) fn from_connector(err: BlockchainError) -> Self {
        match err {
            BlockchainError::UnsupportedChain { chain_id } => Self::UnsupportedChain(chain_id),
            other => Self::InvalidCall(other.to_string()),
        }
    }

    /// Label used for the write outcome metric.
    pub(crate) fn outcome_label(&self) -> &'static str {
        match self {
            Self::SimulationRejected(_) => "rejected",
            Self::SubmissionFailed { .. } => "submission_failed",
            _ => "invalid",
        }
    }
}
