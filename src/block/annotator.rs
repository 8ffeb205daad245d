use crate::block::spec::{BlockSpec, Terminator};
use crate::tree::arena::LineArena;
use serde::Serialize;

/// Result of annotating one block kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BlockAnnotation {
    /// Lines `start + 1 .. end` were attached under `start`.
    Annotated { name: String, start: usize, end: usize },
    /// The start marker was found but no terminator followed it.
    Unterminated { name: String, start: usize },
    /// No line matched the start marker.
    NotFound { name: String },
}

impl BlockAnnotation {
    pub fn name(&self) -> &str {
        match self {
            BlockAnnotation::Annotated { name, .. }
            | BlockAnnotation::Unterminated { name, .. }
            | BlockAnnotation::NotFound { name } => name,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, BlockAnnotation::Annotated { .. })
    }
}

/// Fold the first block matching `spec` into a parent with children.
///
/// Must run after the indentation passes: body lines are moved under the
/// start line even if indentation had already given them a parent.
pub(crate) fn annotate(arena: &mut LineArena, spec: &BlockSpec) -> BlockAnnotation {
    let name = spec.name().to_string();
    let len = arena.len();

    let Some(start) =
        (0..len).find(|&i| !arena[i].is_comment && spec.start().is_match(&arena[i].text))
    else {
        return BlockAnnotation::NotFound { name };
    };

    let end = match spec.terminator() {
        Terminator::Comment => (start + 1..len).find(|&i| arena[i].is_comment),
        Terminator::Delimiter => spec.delimiter(&arena[start].text).and_then(|delimiter| {
            (start + 1..len)
                .find(|&i| arena[i].text.contains(delimiter))
                .map(|i| i + 1)
        }),
    };

    let Some(end) = end else {
        log::warn!("{name} starting at line {start} is not terminated; left unannotated");
        return BlockAnnotation::Unterminated { name, start };
    };

    let body: Vec<usize> = (start + 1..end).filter(|&i| !arena[i].is_comment).collect();
    for &line in &body {
        arena.attach(start, line);
    }
    // Indentation below the last body line may have reached past the block.
    for &line in &body {
        let escaped: Vec<usize> = arena[line]
            .children
            .iter()
            .copied()
            .filter(|&c| c >= end)
            .collect();
        for child in escaped {
            arena.release(child);
        }
    }

    if arena[start].has_children() {
        let node = arena.get_mut(start);
        node.oldest_ancestor = true;
        node.family_endpoint = Some(end);
    }

    log::debug!("{name} folded lines {}..{end} under line {start}", start + 1);
    BlockAnnotation::Annotated { name, start, end }
}
