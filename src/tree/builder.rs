use crate::block::{annotate, BlockAnnotation, BlockSpec};
use crate::tree::arena::LineArena;
use crate::tree::errors::BuildError;
use std::collections::{HashSet, VecDeque};

/// Turns indentation depths into parent/child edges.
///
/// Building runs in this order:
/// 1. first-child detection, one line of lookahead
/// 2. family endpoints for every depth-0 parent
/// 3. orphan recovery inside each family
/// 4. multiline block annotation, once per block spec
pub(crate) struct TreeBuilder {
    arena: LineArena,
    /// Lines that received a child in pass 1, in discovery order
    parents: Vec<usize>,
}

impl TreeBuilder {
    pub(crate) fn new<S: AsRef<str>>(lines: &[S], comment_chars: &[char]) -> Self {
        Self {
            arena: LineArena::from_lines(lines, comment_chars),
            parents: Vec::new(),
        }
    }

    pub(crate) fn build(
        mut self,
        blocks: &[BlockSpec],
    ) -> Result<(LineArena, Vec<BlockAnnotation>), BuildError> {
        self.link_first_children();
        self.arena.mark_family_endpoints(&self.parents);
        self.recover_orphans()?;

        let annotations = blocks
            .iter()
            .map(|spec| annotate(&mut self.arena, spec))
            .collect();

        Ok((self.arena, annotations))
    }

    /// Pass 1: a line directly followed by a deeper non-comment line owns it.
    ///
    /// Only the first child of each parent is found here; later siblings are
    /// orphans until [`Self::recover_orphans`] runs.
    fn link_first_children(&mut self) {
        for i in 0..self.arena.len().saturating_sub(1) {
            let (current, next) = (&self.arena[i], &self.arena[i + 1]);
            if current.is_comment || next.is_comment || next.depth <= current.depth {
                continue;
            }
            self.arena.attach(i, i + 1);
            self.parents.push(i);
        }
        log::debug!("pass 1 found {} parents", self.parents.len());
    }

    /// Pass 2: walk each family breadth-first and adopt same-depth siblings.
    fn recover_orphans(&mut self) -> Result<(), BuildError> {
        let roots: Vec<usize> = self
            .parents
            .iter()
            .copied()
            .filter(|&p| self.arena[p].depth == 0)
            .collect();

        let mut adopted = 0;
        for root in roots {
            let mut visited = HashSet::new();
            let mut queue = VecDeque::from([root]);
            while let Some(node) = queue.pop_front() {
                if !visited.insert(node) {
                    continue;
                }
                adopted += self.adopt_orphans(node)?;
                queue.extend(self.arena[node].children.iter().copied());
            }
        }

        log::debug!("pass 2 recovered {adopted} orphaned children");
        Ok(())
    }

    /// Attach unparented lines at `node`'s child depth that sit inside its
    /// subtree, returning how many were attached.
    ///
    /// The scan is bounded by the family endpoint and stops early at the first
    /// line no deeper than `node` itself.
    fn adopt_orphans(&mut self, node: usize) -> Result<usize, BuildError> {
        let Some(child_indent) = self.arena[node].child_indent else {
            return Ok(0);
        };
        let endpoint = self.arena.family_endpoint_of(node)?;
        let depth = self.arena[node].depth;

        let mut adopted = 0;
        for i in node + 1..endpoint {
            let line = &self.arena[i];
            if line.is_comment {
                continue;
            }
            if line.depth <= depth {
                break;
            }
            if line.depth == child_indent && line.parent.is_none() && self.arena.attach(node, i) {
                adopted += 1;
            }
        }
        Ok(adopted)
    }
}
