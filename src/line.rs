//! Per-line data model and indentation extraction.
//!
//! Every input line becomes exactly one [`ConfigLine`], addressed by its
//! position in the input. Parent/child relationships are stored as line
//! indices into the owning arena rather than as references, so a line never
//! borrows another line.

use serde::Serialize;

/// Default comment marker for IOS-style configurations.
pub const DEFAULT_COMMENT_CHARS: &[char] = &['!'];

/// Leading-whitespace shape of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineShape {
    /// Number of leading whitespace characters
    pub depth: usize,
    /// First non-whitespace character is a comment marker
    pub is_comment: bool,
}

impl LineShape {
    /// Measure a line against the given comment markers.
    ///
    /// A whitespace-only line is never a comment; its depth is its length
    /// in characters.
    pub fn measure(text: &str, comment_chars: &[char]) -> Self {
        let mut depth = 0;
        let mut first = None;
        for ch in text.chars() {
            if ch.is_whitespace() {
                depth += 1;
            } else {
                first = Some(ch);
                break;
            }
        }

        Self {
            depth,
            is_comment: first.is_some_and(|ch| comment_chars.contains(&ch)),
        }
    }
}

/// Measure every line of the input in order.
pub fn extract_shapes<S: AsRef<str>>(lines: &[S], comment_chars: &[char]) -> Vec<LineShape> {
    lines
        .iter()
        .map(|line| LineShape::measure(line.as_ref(), comment_chars))
        .collect()
}

/// One configuration line and its position in the family tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigLine {
    pub(crate) index: usize,
    pub(crate) text: String,
    pub(crate) depth: usize,
    pub(crate) is_comment: bool,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) child_indent: Option<usize>,
    pub(crate) oldest_ancestor: bool,
    pub(crate) family_endpoint: Option<usize>,
}

impl ConfigLine {
    pub(crate) fn new(index: usize, text: &str, shape: LineShape) -> Self {
        Self {
            index,
            text: text.to_string(),
            depth: shape.depth,
            is_comment: shape.is_comment,
            parent: None,
            children: Vec::new(),
            child_indent: None,
            oldest_ancestor: false,
            family_endpoint: None,
        }
    }

    /// Position of this line in the original input.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Leading whitespace character count.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_comment(&self) -> bool {
        self.is_comment
    }

    /// Index of the parent line, `None` for root-level lines.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Child line indices in discovery order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth expected of this line's children, set by the first child found.
    pub fn child_indent(&self) -> Option<usize> {
        self.child_indent
    }

    /// Depth-0 line that heads a family.
    pub fn is_oldest_ancestor(&self) -> bool {
        self.oldest_ancestor
    }

    /// Exclusive upper bound of this line's family, only set on oldest ancestors.
    pub fn family_endpoint(&self) -> Option<usize> {
        self.family_endpoint
    }
}
