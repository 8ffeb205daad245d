use crate::line::{extract_shapes, ConfigLine};
use std::ops::Index;

/// Owning storage for every line of one parse session.
///
/// All edges are indices into `lines`; each edge is recorded on both ends.
#[derive(Debug, Default)]
pub(crate) struct LineArena {
    lines: Vec<ConfigLine>,
}

impl LineArena {
    pub(crate) fn from_lines<S: AsRef<str>>(lines: &[S], comment_chars: &[char]) -> Self {
        let shapes = extract_shapes(lines, comment_chars);
        let lines = lines
            .iter()
            .zip(shapes)
            .enumerate()
            .map(|(index, (text, shape))| ConfigLine::new(index, text.as_ref(), shape))
            .collect();
        Self { lines }
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut ConfigLine {
        &mut self.lines[index]
    }

    /// Make `child` a child of `parent`, moving it away from any previous parent.
    ///
    /// Returns `false` when the edge already existed.
    pub(crate) fn attach(&mut self, parent: usize, child: usize) -> bool {
        if parent == child {
            return false;
        }

        match self.lines[child].parent {
            Some(old) if old == parent => return false,
            Some(old) => self.detach(old, child),
            None => {}
        }

        // A line with a parent cannot head a family.
        let adopted = &mut self.lines[child];
        adopted.parent = Some(parent);
        adopted.oldest_ancestor = false;
        adopted.family_endpoint = None;
        let child_depth = adopted.depth;

        let node = &mut self.lines[parent];
        if !node.children.contains(&child) {
            node.children.push(child);
        }
        if node.child_indent.is_none() {
            node.child_indent = Some(child_depth);
        }

        log::trace!("attached line {child} under line {parent}");
        true
    }

    /// Turn `child` back into a root-level line.
    pub(crate) fn release(&mut self, child: usize) {
        if let Some(parent) = self.lines[child].parent.take() {
            self.detach(parent, child);
        }
    }

    fn detach(&mut self, parent: usize, child: usize) {
        let node = &mut self.lines[parent];
        node.children.retain(|&c| c != child);
        if node.children.is_empty() {
            node.oldest_ancestor = false;
            node.family_endpoint = None;
            node.child_indent = None;
        }
    }

    pub(crate) fn lines(&self) -> &[ConfigLine] {
        &self.lines
    }
}

impl Index<usize> for LineArena {
    type Output = ConfigLine;

    fn index(&self, index: usize) -> &ConfigLine {
        &self.lines[index]
    }
}
