//! Error types for graph serialization.
//!
//! ## Error Categories
//!
//! - **Usage-sequence errors**: `serialize`/`close` before `open`, `open` twice,
//!   anything after `close` (except a second `close`, which is a no-op)
//! - **Graph errors**: dangling node ids, linking children into the wrong kind of node,
//!   cycles that cannot be broken by an alias
//! - **Configuration errors**: malformed version strings and anchor templates
//! - **Sink errors**: failures raised by the event sink, propagated unchanged
//!
//! ## Examples
//!
//! ```rust
//! use yaml_serializer::{Error, Event, Serializer, SerializerOptions};
//!
//! let sink: Vec<Event> = Vec::new();
//! let mut serializer = Serializer::new(sink, SerializerOptions::default()).unwrap();
//! let err = serializer.close().unwrap_err();
//! assert!(matches!(err, Error::NotOpened));
//! assert_eq!(err.to_string(), "serializer is not opened");
//! ```

use crate::NodeId;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while building graphs or serializing them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `serialize` or `close` called before `open`
    #[error("serializer is not opened")]
    NotOpened,

    /// `open` called on an already opened serializer
    #[error("serializer is already opened")]
    AlreadyOpened,

    /// `open` or `serialize` called after `close`
    #[error("serializer is closed")]
    Closed,

    /// A node id that does not belong to the graph
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A child was linked into a node of the wrong kind
    #[error("node {node} is a {found}, expected a {expected}")]
    KindMismatch {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    /// Version string not of the form `<major>.<minor>`
    #[error("invalid version '{0}': expected <major>.<minor>")]
    InvalidVersion(String),

    /// Anchor template without exactly one run of `#`
    #[error("invalid anchor format '{0}': expected exactly one run of '#'")]
    InvalidAnchorFormat(String),

    /// A cycle made only of anchor-exempt nodes, which no alias can break
    #[error("cycle through node {0} cannot be broken: the node is exempt from anchoring")]
    UnanchoredCycle(NodeId),

    /// IO error raised while writing events
    #[error("IO error: {0}")]
    Io(String),

    /// Failure reported by an event sink
    #[error("event sink error: {0}")]
    Sink(String),
}

impl Error {
    /// Creates a kind mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_serializer::{Error, NodeId};
    ///
    /// let err = Error::kind_mismatch(NodeId::new(3), "sequence", "scalar");
    /// assert_eq!(err.to_string(), "node #3 is a scalar, expected a sequence");
    /// ```
    pub fn kind_mismatch(node: NodeId, expected: &'static str, found: &'static str) -> Self {
        Error::KindMismatch {
            node,
            expected,
            found,
        }
    }

    /// Creates an error for a failure inside an event sink.
    pub fn sink<T: fmt::Display>(msg: T) -> Self {
        Error::Sink(msg.to_string())
    }

    /// Returns `true` for errors caused by calling the serializer out of order.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::NotOpened | Error::AlreadyOpened | Error::Closed)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
