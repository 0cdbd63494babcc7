//! Error types for the REST connection.
//!
//! # Design
//! `RestError` names where a call failed: before I/O (missing or
//! unserializable body), in the transport, at the HTTP status check, or while
//! decoding the payload. Public operations never hand a `RestError` back
//! directly; they convert it into `Diagnostics`, the ordered list of
//! human-readable messages for that one call. A wrapped cause becomes a
//! second `"Additional Information: ..."` line.

use std::fmt;

use thiserror::Error;

/// Message used when PUT/POST is attempted without a body.
pub const MISSING_BODY: &str = "Body cannot be Null or Empty";

/// Internal failure taxonomy.
#[derive(Debug, Error)]
pub enum RestError {
    /// PUT/POST without a serialized body. No I/O was performed.
    #[error("{}", MISSING_BODY)]
    MissingBody,

    /// The request model could not be serialized to JSON.
    #[error("Unable to serialize request body")]
    Serialization(#[source] serde_json::Error),

    /// DNS, connect, TLS, or protocol fault below HTTP.
    #[error("{message}")]
    Transport {
        message: String,
        cause: Option<String>,
    },

    /// The server answered with a status the operation does not accept.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// The payload arrived but could not be turned into the expected shape.
    #[error("{failure}")]
    Decode {
        failure: DecodeFailure,
        detail: Option<String>,
    },

    /// A request task on the transport runtime did not run to completion.
    #[error("request task aborted: {0}")]
    Executor(String),

    /// Invalid configuration, or a transport that could not be built.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RestError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RestError::MissingBody | RestError::Serialization(_) | RestError::Config(_) => {
                FailureKind::Construction
            }
            RestError::Transport { .. } | RestError::Executor(_) => FailureKind::Transport,
            RestError::HttpStatus { .. } => FailureKind::HttpStatus,
            RestError::Decode { .. } => FailureKind::Decode,
        }
    }

    /// Text for the `"Additional Information: ..."` line, when there is one.
    fn additional_information(&self) -> Option<String> {
        match self {
            RestError::Serialization(e) => Some(e.to_string()),
            RestError::Transport { cause, .. } => cause.clone(),
            RestError::Decode { detail, .. } => detail.clone(),
            _ => None,
        }
    }

    pub(crate) fn decode(failure: DecodeFailure, source: Option<&serde_json::Error>) -> Self {
        RestError::Decode {
            failure,
            detail: source.map(|e| e.to_string()),
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(e: reqwest::Error) -> Self {
        let cause = std::error::Error::source(&e).map(|source| source.to_string());
        RestError::Transport {
            message: e.to_string(),
            cause,
        }
    }
}

/// Which decode path failed. The messages differ because single-entity and
/// list decoding fail for different reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    /// A single entity could not be decoded.
    Entity,
    /// The payload was neither an array nor an object carrying a list.
    NoList,
    /// The payload looked like a list but did not match the entity schema.
    List,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DecodeFailure::Entity => "Unable to decode result",
            DecodeFailure::NoList => "No List Returned",
            DecodeFailure::List => "Unable to process a list from the result",
        };
        f.write_str(message)
    }
}

/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Construction,
    Transport,
    HttpStatus,
    Decode,
}

/// The diagnostic list returned by a failed call.
///
/// Messages are in the order they were produced and describe only the call
/// that returned them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("; "))]
pub struct Diagnostics {
    kind: FailureKind,
    status: Option<u16>,
    messages: Vec<String>,
}

impl Diagnostics {
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// HTTP status of the response that caused the failure, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.messages
    }
}

impl From<RestError> for Diagnostics {
    fn from(error: RestError) -> Self {
        let status = match &error {
            RestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        };
        let mut messages = vec![error.to_string()];
        if let Some(info) = error.additional_information() {
            messages.push(format!("Additional Information: {info}"));
        }
        Diagnostics {
            kind: error.kind(),
            status,
            messages,
        }
    }
}
