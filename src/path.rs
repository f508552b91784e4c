//! Property paths locating values inside a validated graph.
//!
//! This module provides [`PropertyPath`] and [`PathElement`] types for building
//! and encoding the address of a violation (e.g. `users[0].email`).
//!
//! Paths are immutable backward-linked chains: appending an element creates a
//! new leaf node that points at the existing chain, so a common prefix is
//! shared between every branch derived from it.

mod parser;

use std::fmt::{self, Display, Write as _};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

pub use parser::PathError;

/// A single element of a property path.
///
/// Paths are built from elements that represent either property access or
/// array indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// A property access (e.g., `user`, `email`, `['first name']`)
    Property(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathElement {
    /// Creates a new property element.
    pub fn property(name: impl Into<String>) -> Self {
        PathElement::Property(name.into())
    }

    /// Creates a new index element.
    pub fn index(idx: usize) -> Self {
        PathElement::Index(idx)
    }

    /// Returns true for array index elements.
    pub fn is_index(&self) -> bool {
        matches!(self, PathElement::Index(_))
    }
}

impl Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Property(name) => f.write_str(name),
            PathElement::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for PathElement {
    fn from(name: &str) -> Self {
        PathElement::Property(name.to_string())
    }
}

impl From<String> for PathElement {
    fn from(name: String) -> Self {
        PathElement::Property(name)
    }
}

impl From<usize> for PathElement {
    fn from(idx: usize) -> Self {
        PathElement::Index(idx)
    }
}

struct PathNode {
    parent: Option<Arc<PathNode>>,
    element: PathElement,
    len: usize,
}

/// The address of a value in a validated graph.
///
/// `PropertyPath` represents locations like `users[0].email` and provides
/// methods for building paths incrementally. The empty path is the root.
///
/// # Example
///
/// ```rust
/// use inquest::PropertyPath;
///
/// let path = PropertyPath::root()
///     .with_property("users")
///     .with_index(0)
///     .with_property("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
///
/// let parsed: PropertyPath = "users[0].email".parse().unwrap();
/// assert_eq!(parsed, path);
/// ```
#[derive(Clone, Default)]
pub struct PropertyPath {
    leaf: Option<Arc<PathNode>>,
}

impl PropertyPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a sequence of elements, in root-to-leaf order.
    pub fn new<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        Self::root().with(elements)
    }

    /// Returns a new path with the elements appended.
    ///
    /// The receiver is never modified; the returned path shares its nodes.
    pub fn with<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        let mut leaf = self.leaf.clone();
        for element in elements {
            let len = leaf.as_ref().map_or(0, |node| node.len) + 1;
            leaf = Some(Arc::new(PathNode {
                parent: leaf,
                element,
                len,
            }));
        }
        Self { leaf }
    }

    /// Returns a new path with a property element appended.
    pub fn with_property(&self, name: impl Into<String>) -> Self {
        self.with([PathElement::Property(name.into())])
    }

    /// Returns a new path with an index element appended.
    pub fn with_index(&self, index: usize) -> Self {
        self.with([PathElement::Index(index)])
    }

    /// Returns true if this is the root path (no elements).
    pub fn is_root(&self) -> bool {
        self.leaf.is_none()
    }

    /// Returns the number of elements in this path.
    pub fn len(&self) -> usize {
        self.leaf.as_ref().map_or(0, |node| node.len)
    }

    /// Returns true if this path has no elements.
    pub fn is_empty(&self) -> bool {
        self.leaf.is_none()
    }

    /// Returns the elements in root-to-leaf order.
    pub fn elements(&self) -> Vec<&PathElement> {
        let mut elements = Vec::with_capacity(self.len());
        let mut node = self.leaf.as_deref();
        while let Some(current) = node {
            elements.push(&current.element);
            node = current.parent.as_deref();
        }
        elements.reverse();
        elements
    }

    /// Returns an iterator over the elements in root-to-leaf order.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements().into_iter()
    }

    /// Returns the parent path (all elements except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        self.leaf.as_ref().map(|node| Self {
            leaf: node.parent.clone(),
        })
    }

    /// Returns the last element, or None if this is root.
    pub fn last(&self) -> Option<&PathElement> {
        self.leaf.as_deref().map(|node| &node.element)
    }
}

impl PartialEq for PropertyPath {
    fn eq(&self, other: &Self) -> bool {
        match (&self.leaf, &other.leaf) {
            (None, None) => true,
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.len() == other.len() && self.elements() == other.elements(),
        }
    }
}

impl Eq for PropertyPath {}

impl Hash for PropertyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self.elements() {
            element.hash(state);
        }
    }
}

impl fmt::Debug for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyPath").field(&self.to_string()).finish()
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements().into_iter().enumerate() {
            match element {
                PathElement::Index(idx) => write!(f, "[{}]", idx)?,
                PathElement::Property(name) if is_identifier(name) => {
                    if i > 0 {
                        f.write_char('.')?;
                    }
                    f.write_str(name)?;
                }
                PathElement::Property(name) => {
                    f.write_str("['")?;
                    for c in name.chars() {
                        if c == '\'' || c == '\\' {
                            f.write_char('\\')?;
                        }
                        f.write_char(c)?;
                    }
                    f.write_str("']")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

impl FromIterator<PathElement> for PropertyPath {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self::new(iter)
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_first_identifier_char(first) => chars.all(is_identifier_char),
        _ => false,
    }
}

pub(crate) fn is_first_identifier_char(c: char) -> bool {
    c.is_alphabetic() || c == '$' || c == '_'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    is_first_identifier_char(c) || c.is_ascii_digit()
}
