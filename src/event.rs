//! Structural events produced by the serializer.
//!
//! A stream always has the shape
//! `StreamStart (DocumentStart <node events> DocumentEnd)* StreamEnd`.
//! Node events are either a single [`Event::Scalar`], a single [`Event::Alias`],
//! or a `*Start` event, the children's events, and the matching `*End` event.

use crate::{Error, FlowStyle, Result, ScalarStyle};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `%YAML <major>.<minor>` directive value.
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::Version;
///
/// let v: Version = "1.1".parse().unwrap();
/// assert_eq!(v, Version::new(1, 1));
/// assert_eq!(v.to_string(), "1.1");
/// assert!("1".parse::<Version>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Version {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Whether a scalar's tag may be omitted when written.
///
/// `plain` is set when the tag equals what a reader would infer from the text,
/// `quoted` when it equals the kind default (the tag a quoted scalar gets).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImplicitTags {
    pub plain: bool,
    pub quoted: bool,
}

impl ImplicitTags {
    pub const EXPLICIT: ImplicitTags = ImplicitTags {
        plain: false,
        quoted: false,
    };

    #[must_use]
    pub const fn new(plain: bool, quoted: bool) -> Self {
        ImplicitTags { plain, quoted }
    }

    /// The flag that applies to a scalar written in `style`.
    #[must_use]
    pub const fn for_style(self, style: ScalarStyle) -> bool {
        match style {
            ScalarStyle::Plain => self.plain,
            _ => self.quoted,
        }
    }
}

/// An atomic unit of the serialized event stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart {
        explicit: bool,
        version: Option<Version>,
        /// Tag directives (handle → prefix), present only when headers are in use
        tags: Option<IndexMap<String, String>>,
    },
    DocumentEnd {
        explicit: bool,
    },
    Alias {
        anchor: String,
    },
    Scalar {
        anchor: Option<String>,
        tag: String,
        implicit: ImplicitTags,
        value: String,
        style: ScalarStyle,
    },
    SequenceStart {
        anchor: Option<String>,
        tag: String,
        implicit: bool,
        flow_style: FlowStyle,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<String>,
        tag: String,
        implicit: bool,
        flow_style: FlowStyle,
    },
    MappingEnd,
}

impl Event {
    /// Anchor carried by a node event, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Event::Scalar { anchor, .. }
            | Event::SequenceStart { anchor, .. }
            | Event::MappingStart { anchor, .. } => anchor.as_deref(),
            _ => None,
        }
    }

    /// True for events that stand for one node (scalar, alias, collection start).
    #[must_use]
    pub fn is_node(&self) -> bool {
        matches!(
            self,
            Event::Alias { .. }
                | Event::Scalar { .. }
                | Event::SequenceStart { .. }
                | Event::MappingStart { .. }
        )
    }
}
