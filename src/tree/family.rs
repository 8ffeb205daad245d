//! Family boundary resolution.
//!
//! A family starts at a depth-0 line that spawns children and ends just
//! before the next depth-0, non-comment line. Using the example below:
//!
//! ```text
//! 0  policy-map QOS_1
//! 1   class GOLD
//! 2    priority percent 10
//! 3   class SILVER
//! 4    bandwidth 30
//! 5    random-detect
//! 6   class default
//! 7  !
//! 8  interface Serial1/0
//! 9   encapsulation ppp
//! 10 !
//! ```
//!
//! line 0 heads a family ending at 8, and line 8 heads a family ending at 11
//! (end of input) because comments never close a family.

use crate::tree::arena::LineArena;
use crate::tree::errors::BuildError;

impl LineArena {
    /// Mark each depth-0 parent as an oldest ancestor and set its endpoint.
    pub(crate) fn mark_family_endpoints(&mut self, parents: &[usize]) {
        for &parent in parents {
            if self[parent].depth != 0 {
                continue;
            }
            let endpoint = self.next_top_level(parent);
            let node = self.get_mut(parent);
            node.oldest_ancestor = true;
            node.family_endpoint = Some(endpoint);
            log::debug!("family at line {parent} ends at {endpoint}");
        }
    }

    /// Index of the first non-comment depth-0 line after `index`, or the input length.
    fn next_top_level(&self, index: usize) -> usize {
        (index + 1..self.len())
            .find(|&i| !self[i].is_comment && self[i].depth == 0)
            .unwrap_or(self.len())
    }

    /// Trace `index` through its parents to the oldest ancestor and return
    /// that ancestor's family endpoint.
    pub(crate) fn family_endpoint_of(&self, index: usize) -> Result<usize, BuildError> {
        let mut current = index;
        // Every hop moves to a distinct line unless the edges are corrupt.
        for _ in 0..=self.len() {
            let node = &self[current];
            if node.oldest_ancestor {
                return node
                    .family_endpoint
                    .ok_or(BuildError::MissingEndpoint { line: current });
            }
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Err(BuildError::UnresolvedFamily { line: index })
    }
}
