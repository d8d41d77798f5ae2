//! Configuration options for graph serialization.
//!
//! [`SerializerOptions`] collects the document-marker, directive, tagging and
//! anchor-naming settings read by [`Serializer::new`](crate::Serializer::new).
//! It deserializes from any serde format using the camelCase option names
//! (`explicitStart`, `anchorFormat`, ...), so a host application can keep it
//! in its own configuration file.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_serializer::SerializerOptions;
//!
//! let options = SerializerOptions::new()
//!     .with_explicit_start(true)
//!     .with_version("1.1")
//!     .with_anchor_format("ref###");
//!
//! assert!(options.explicit_start);
//! assert_eq!(options.anchor_template().unwrap().format(5), "ref005");
//! ```

use crate::{AnchorTemplate, Result, Version};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration options for a [`Serializer`](crate::Serializer).
///
/// # Examples
///
/// ```rust
/// use yaml_serializer::SerializerOptions;
///
/// // Every node tag written explicitly
/// let options = SerializerOptions::new().with_explicit_types(true);
/// assert!(options.explicit_types);
///
/// // Defaults: no markers, no directives, implicit tags allowed, "id####" anchors
/// let options = SerializerOptions::default();
/// assert!(!options.explicit_start);
/// assert_eq!(options.directive_version().unwrap(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializerOptions {
    /// Force a `---` document start marker
    pub explicit_start: bool,
    /// Force a `...` document end marker
    pub explicit_end: bool,
    /// Emit a `%YAML` directive carrying [`version`](Self::version)
    pub use_version: bool,
    /// `<major>.<minor>`, read only when `use_version` is set
    pub version: String,
    /// Emit the tag directives with every document start
    pub use_header: bool,
    /// Tag directive handles and their prefixes
    pub tag_directives: IndexMap<String, String>,
    /// Never mark a tag as implicit
    pub explicit_types: bool,
    /// Anchor label template, see [`AnchorTemplate`]
    pub anchor_format: String,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        SerializerOptions {
            explicit_start: false,
            explicit_end: false,
            use_version: false,
            version: "1.1".to_string(),
            use_header: false,
            tag_directives: IndexMap::new(),
            explicit_types: false,
            anchor_format: AnchorTemplate::DEFAULT.to_string(),
        }
    }
}

impl SerializerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_explicit_start(mut self, explicit: bool) -> Self {
        self.explicit_start = explicit;
        self
    }

    #[must_use]
    pub fn with_explicit_end(mut self, explicit: bool) -> Self {
        self.explicit_end = explicit;
        self
    }

    /// Enables the `%YAML` directive with the given version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.use_version = true;
        self.version = version.into();
        self
    }

    /// Adds a tag directive and turns headers on.
    #[must_use]
    pub fn with_tag_directive(
        mut self,
        handle: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.use_header = true;
        self.tag_directives.insert(handle.into(), prefix.into());
        self
    }

    #[must_use]
    pub fn with_explicit_types(mut self, explicit: bool) -> Self {
        self.explicit_types = explicit;
        self
    }

    #[must_use]
    pub fn with_anchor_format(mut self, format: impl Into<String>) -> Self {
        self.anchor_format = format.into();
        self
    }

    /// The version pair for document starts, or `None` when versions are off.
    pub fn directive_version(&self) -> Result<Option<Version>> {
        if self.use_version {
            self.version.parse().map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn anchor_template(&self) -> Result<AnchorTemplate> {
        AnchorTemplate::parse(&self.anchor_format)
    }

    /// Tag directives for document starts, or `None` when headers are off.
    #[must_use]
    pub fn header_tags(&self) -> Option<IndexMap<String, String>> {
        self.use_header.then(|| self.tag_directives.clone())
    }
}
