//! Indentation-to-tree construction.
//!
//! [`ConfigTree::parse`] runs the whole build in one batch and hands back an
//! immutable tree. A tree that failed to build is never returned.

pub(crate) mod arena;
mod builder;
pub mod errors;
mod family;

pub use errors::BuildError;

use crate::block::{BlockAnnotation, BlockSpec};
use crate::line::{ConfigLine, DEFAULT_COMMENT_CHARS};
use crate::query::QueryEngine;
use crate::source;
use arena::LineArena;
use builder::TreeBuilder;

/// Knobs for one parse session.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Characters that mark a line as a comment when they are its first
    /// non-whitespace character
    pub comment_chars: Vec<char>,
    /// Multiline block kinds folded after the indentation passes
    pub blocks: Vec<BlockSpec>,
}

impl Default for ParseOptions {
    /// IOS conventions: `!` comments and the four banner kinds.
    fn default() -> Self {
        Self {
            comment_chars: DEFAULT_COMMENT_CHARS.to_vec(),
            blocks: BlockSpec::ios_banners(),
        }
    }
}

impl ParseOptions {
    /// Indentation only, no block annotation.
    pub fn indentation_only() -> Self {
        Self {
            blocks: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_block(mut self, spec: BlockSpec) -> Self {
        self.blocks.push(spec);
        self
    }

    pub fn with_comment_chars(mut self, chars: &[char]) -> Self {
        self.comment_chars = chars.to_vec();
        self
    }
}

/// A fully built, read-only configuration line tree.
#[derive(Debug)]
pub struct ConfigTree {
    arena: LineArena,
    annotations: Vec<BlockAnnotation>,
}

impl ConfigTree {
    /// Build the tree for an ordered sequence of lines.
    pub fn parse<S: AsRef<str>>(lines: &[S], options: &ParseOptions) -> Result<Self, BuildError> {
        let (arena, annotations) =
            TreeBuilder::new(lines, &options.comment_chars).build(&options.blocks)?;
        log::debug!(
            "built tree of {} lines, {} families",
            arena.len(),
            arena.lines().iter().filter(|l| l.is_oldest_ancestor()).count()
        );
        Ok(Self { arena, annotations })
    }

    /// Split `text` on line breaks and build the tree.
    pub fn from_text(text: &str, options: &ParseOptions) -> Result<Self, BuildError> {
        Self::parse(&source::split_lines(text), options)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// All lines in input order.
    pub fn lines(&self) -> &[ConfigLine] {
        self.arena.lines()
    }

    pub fn line(&self, index: usize) -> Option<&ConfigLine> {
        self.arena.lines().get(index)
    }

    pub(crate) fn text(&self, index: usize) -> &str {
        &self.arena[index].text
    }

    /// Families in line order.
    pub fn oldest_ancestors(&self) -> impl Iterator<Item = &ConfigLine> {
        self.lines().iter().filter(|line| line.is_oldest_ancestor())
    }

    /// Endpoint of the family containing `index`.
    pub fn family_endpoint_of(&self, index: usize) -> Result<usize, BuildError> {
        if index >= self.len() {
            return Err(BuildError::UnresolvedFamily { line: index });
        }
        self.arena.family_endpoint_of(index)
    }

    /// Outcome of each configured block kind, in configuration order.
    pub fn annotations(&self) -> &[BlockAnnotation] {
        &self.annotations
    }

    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(self)
    }
}
