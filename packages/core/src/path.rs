//! Absolute, slash-delimited tree paths.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The path separator. The root directory is addressed by this character alone.
pub const SEPARATOR: char = '/';

/// Errors related to path parsing and name validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string cannot denote any node.
    #[error("malformed path {path:?}: {reason}")]
    Malformed { path: String, reason: &'static str },

    /// A node name cannot be used as a path segment.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
}

/// A validated absolute path.
///
/// A well-formed path starts with `/` and is a sequence of non-empty segments
/// separated by `/`. The bare separator denotes the root. `.` and `..` carry
/// no special meaning; they are literal names like any other.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// The path of the root directory.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse an absolute path string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use acltree_core::TreePath;
    ///
    /// let path = TreePath::parse("/docs/report.txt").unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert!(TreePath::parse("/").unwrap().is_root());
    ///
    /// // Relative paths and empty segments are rejected
    /// assert!(TreePath::parse("docs").is_err());
    /// assert!(TreePath::parse("/docs/").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let malformed = |reason| PathError::Malformed {
            path: s.to_string(),
            reason,
        };

        let rest = s
            .strip_prefix(SEPARATOR)
            .ok_or_else(|| malformed("must start with '/'"))?;
        if rest.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in rest.split(SEPARATOR) {
            if segment.is_empty() {
                return Err(malformed("empty path segment"));
            }
            if segment.contains('\0') {
                return Err(malformed("path segment contains NUL"));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// The final segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The enclosing directory's path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<TreePath> {
        self.segments.split_last().map(|(_, parent)| TreePath {
            segments: parent.to_vec(),
        })
    }

    /// Split into the final segment and the segments leading to it.
    pub fn split_last(&self) -> Option<(&str, &[String])> {
        self.segments
            .split_last()
            .map(|(name, parent)| (name.as_str(), parent))
    }

    /// Append a validated name.
    pub fn join(&self, name: &str) -> Result<TreePath, PathError> {
        validate_name(name)?;
        Ok(self.child(name))
    }

    /// Append a name already known to be valid (taken from an existing node).
    pub(crate) fn child(&self, name: &str) -> TreePath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        TreePath { segments }
    }
}

/// Validate a node name.
///
/// Names are case-sensitive, must be non-empty and may not contain the
/// separator or NUL.
pub fn validate_name(name: &str) -> Result<(), PathError> {
    let invalid = |reason| PathError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(invalid("name contains the path separator"));
    }
    if name.contains('\0') {
        return Err(invalid("name contains NUL"));
    }
    Ok(())
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{}", SEPARATOR);
        }
        for segment in &self.segments {
            write!(f, "{}{}", SEPARATOR, segment)?;
        }
        Ok(())
    }
}

impl FromStr for TreePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TreePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TreePath {
    fn deserialize<D>(deserializer: D) -> Result<TreePath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        TreePath::parse(&s).map_err(D::Error::custom)
    }
}

/// Anything the tree operations accept as a path: strings are parsed,
/// `TreePath`s are used as they are.
pub trait IntoTreePath {
    fn into_tree_path(self) -> Result<TreePath, PathError>;
}

impl IntoTreePath for &str {
    fn into_tree_path(self) -> Result<TreePath, PathError> {
        TreePath::parse(self)
    }
}

impl IntoTreePath for &String {
    fn into_tree_path(self) -> Result<TreePath, PathError> {
        TreePath::parse(self)
    }
}

impl IntoTreePath for TreePath {
    fn into_tree_path(self) -> Result<TreePath, PathError> {
        Ok(self)
    }
}

impl IntoTreePath for &TreePath {
    fn into_tree_path(self) -> Result<TreePath, PathError> {
        Ok(self.clone())
    }
}

/// Macro for creating paths from literals.
///
/// # Example
///
/// ```rust
/// use acltree_core::tree_path;
///
/// let p = tree_path!("/academics/courses");
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! tree_path {
    ($s:expr) => {
        $crate::TreePath::parse($s).expect("invalid path literal")
    };
}
