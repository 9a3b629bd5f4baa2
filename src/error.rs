//! Error types for environment resolution
//!
//! Every failure the resolver can hit falls into one of four kinds: bad
//! configuration, a control plane call that failed, an infrastructure layout
//! the resolver cannot interpret, or a target group whose tags do not say
//! which environment it belongs to. Each kind maps to its own exit status.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while resolving the live environment
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A control plane request failed (network, credentials, API error)
    #[error("{operation} failed: {message}")]
    ControlPlane { operation: String, message: String },

    /// The load balancer has no listener
    #[error("No listener found for load balancer {load_balancer_arn}")]
    NoListener { load_balancer_arn: String },

    /// The load balancer has more listeners than the resolver can interpret
    #[error(
        "Expected exactly one listener for load balancer {load_balancer_arn}, found {count} ({listeners})"
    )]
    MultipleListeners {
        load_balancer_arn: String,
        count: usize,
        /// Protocol and port of each listener, e.g. `HTTP:80, HTTPS:443`
        listeners: String,
    },

    /// No rule forwards `/*` to a single target group
    #[error("Couldn't find live target group for listener {listener_arn}. First deployment?")]
    NoLiveTargetGroup { listener_arn: String },

    /// The tag lookup returned nothing for the target group
    #[error("No tag description returned for target group {target_group_arn}")]
    NoTagDescription { target_group_arn: String },

    /// The target group carries no `Name` tag
    #[error("Target group {target_group_arn} has no Name tag")]
    MissingNameTag { target_group_arn: String },

    /// The `Name` tag mentions neither environment
    #[error("Couldn't find blue or green in target group Name tag '{value}'")]
    Unclassifiable { value: String },

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Broad category of a [`ResolveError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Ambiguity,
    Classification,
}

impl ErrorKind {
    /// Process exit status for this kind of failure. Codes 1 and 2 are left
    /// to output failures and clap usage errors.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Config => 6,
            ErrorKind::Transport => 3,
            ErrorKind::Ambiguity => 4,
            ErrorKind::Classification => 5,
        }
    }
}

impl ResolveError {
    pub fn control_plane(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::ControlPlane {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::ControlPlane { .. } => ErrorKind::Transport,
            ResolveError::NoListener { .. }
            | ResolveError::MultipleListeners { .. }
            | ResolveError::NoLiveTargetGroup { .. }
            | ResolveError::NoTagDescription { .. } => ErrorKind::Ambiguity,
            ResolveError::MissingNameTag { .. } | ResolveError::Unclassifiable { .. } => {
                ErrorKind::Classification
            }
            ResolveError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
