//! Dotted property keys
//!
//! A [`PropertyKey`] is an ordered list of segments. Its textual form joins
//! the segments with `.`; a literal dot inside a segment is written `\.`
//! and a literal backslash `\\`. Comparisons and prefix tests work on the
//! segments, never on the joined string.

use std::fmt;

const SEPARATOR: char = '.';
const ESCAPE: char = '\\';

/// Address of a leaf in the property store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PropertyKey {
    segments: Vec<String>,
}

impl PropertyKey {
    /// The root key (no segments)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a key from already-split segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted string into a key
    ///
    /// The empty string is the root key. A trailing lone backslash is kept
    /// as a literal backslash.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = dotted.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                ESCAPE => match chars.peek() {
                    Some(&next) if next == SEPARATOR || next == ESCAPE => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push(ESCAPE),
                },
                SEPARATOR => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root key
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, if any
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// A new key with `segment` appended
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// A new key with all of `other`'s segments appended
    pub fn join(&self, other: &PropertyKey) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// The key without its last segment; `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Segment-wise prefix test. Every key starts with the root key.
    pub fn starts_with(&self, prefix: &PropertyKey) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// The remainder of this key after `prefix`, if it is a prefix
    pub fn strip_prefix(&self, prefix: &PropertyKey) -> Option<Self> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self {
            segments: self.segments[prefix.segments.len()..].to_vec(),
        })
    }

    /// All proper ancestors, nearest last (excluding the root)
    pub fn ancestors(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        (1..self.segments.len()).map(move |n| Self {
            segments: self.segments[..n].to_vec(),
        })
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            for c in segment.chars() {
                if c == SEPARATOR || c == ESCAPE {
                    write!(f, "{}", ESCAPE)?;
                }
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for PropertyKey {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for PropertyKey {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}
