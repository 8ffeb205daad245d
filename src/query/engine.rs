use crate::line::ConfigLine;
use crate::query::matcher::LineMatcher;
use crate::tree::ConfigTree;
use std::collections::BTreeSet;

/// Deduplicate line indices and sort them ascending.
pub fn unique(indices: impl IntoIterator<Item = usize>) -> Vec<usize> {
    indices.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Engine for structural queries against a built [`ConfigTree`].
///
/// Using the configuration below:
///
/// ```text
/// 0  policy-map QOS_1
/// 1   class GOLD
/// 2    priority percent 10
/// 3   class SILVER
/// 4    bandwidth 30
/// 5    random-detect
/// 6   class default
/// 7  !
/// ```
///
/// - children of 0 are 1, 3, 6; children of 3 are 4, 5
/// - siblings of 4 are 4 and 5
/// - ancestors of 5 are 3 then 0
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'t> {
    tree: &'t ConfigTree,
}

impl<'t> QueryEngine<'t> {
    pub fn new(tree: &'t ConfigTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'t ConfigTree {
        self.tree
    }

    /// Lines whose text matches, as node references.
    pub fn find_line_objects<M: LineMatcher + ?Sized>(&self, spec: &M) -> Vec<&'t ConfigLine> {
        self.tree
            .lines()
            .iter()
            .filter(|line| spec.is_match(line.text()))
            .collect()
    }

    /// The equivalent of a case-sensitive grep over the configuration.
    pub fn find_lines<M: LineMatcher + ?Sized>(&self, spec: &M) -> Vec<&'t str> {
        self.find_line_objects(spec)
            .into_iter()
            .map(ConfigLine::text)
            .collect()
    }

    /// Matching lines and their immediate children.
    pub fn find_children<M: LineMatcher + ?Sized>(&self, spec: &M) -> Vec<&'t str> {
        let found = self
            .find_line_objects(spec)
            .into_iter()
            .flat_map(|line| std::iter::once(line.index()).chain(line.children().iter().copied()));
        self.to_lines(unique(found))
    }

    /// Matching lines and every descendant below them.
    pub fn find_all_children<M: LineMatcher + ?Sized>(&self, spec: &M) -> Vec<&'t str> {
        let found = self.find_line_objects(spec).into_iter().flat_map(|line| {
            std::iter::once(line.index()).chain(self.descendant_indices(line.index()))
        });
        self.to_lines(unique(found))
    }

    /// Matching lines, their siblings, and the ancestors of all of those.
    ///
    /// Children of the collected lines are not included.
    pub fn find_blocks<M: LineMatcher + ?Sized>(&self, spec: &M) -> Vec<&'t str> {
        let mut collected = BTreeSet::new();
        for line in self.find_line_objects(spec) {
            collected.insert(line.index());
            collected.extend(self.sibling_indices(line.index()));
        }

        let ancestors: Vec<usize> = collected
            .iter()
            .flat_map(|&i| self.ancestor_indices(i))
            .collect();
        collected.extend(ancestors);

        self.to_lines(collected)
    }

    /// Ancestors matching `parent_spec` of every line matching `child_spec`.
    pub fn find_parents_with_child<P, C>(&self, parent_spec: &P, child_spec: &C) -> Vec<&'t str>
    where
        P: LineMatcher + ?Sized,
        C: LineMatcher + ?Sized,
    {
        let found = self
            .find_line_objects(child_spec)
            .into_iter()
            .flat_map(|child| self.ancestor_indices(child.index()))
            .filter(|&i| parent_spec.is_match(self.tree.text(i)));
        self.to_lines(unique(found))
    }

    /// Oldest ancestors matching `parent_spec` without an immediate child
    /// matching `child_spec`.
    ///
    /// Only families are considered, not nested parents.
    pub fn find_parents_without_child<P, C>(
        &self,
        parent_spec: &P,
        child_spec: &C,
    ) -> Vec<&'t str>
    where
        P: LineMatcher + ?Sized,
        C: LineMatcher + ?Sized,
    {
        self.tree
            .oldest_ancestors()
            .filter(|parent| parent_spec.is_match(parent.text()))
            .filter(|parent| {
                !parent
                    .children()
                    .iter()
                    .any(|&c| child_spec.is_match(self.tree.text(c)))
            })
            .map(ConfigLine::text)
            .collect()
    }

    /// Immediate children of a line, in discovery order.
    pub fn children(&self, index: usize) -> Vec<&'t ConfigLine> {
        self.objects(self.child_indices(index))
    }

    /// Every line sharing `index`'s parent, itself included.
    ///
    /// A root-level line has no siblings.
    pub fn siblings(&self, index: usize) -> Vec<&'t ConfigLine> {
        self.objects(self.sibling_indices(index))
    }

    /// Ancestors of a line, nearest first.
    pub fn ancestors(&self, index: usize) -> Vec<&'t ConfigLine> {
        self.objects(self.ancestor_indices(index))
    }

    /// All descendants of a line in line order, not including the line itself.
    pub fn descendants(&self, index: usize) -> Vec<&'t ConfigLine> {
        self.objects(unique(self.descendant_indices(index)))
    }

    fn child_indices(&self, index: usize) -> Vec<usize> {
        self.tree
            .line(index)
            .map(|line| line.children().to_vec())
            .unwrap_or_default()
    }

    fn sibling_indices(&self, index: usize) -> Vec<usize> {
        self.tree
            .line(index)
            .and_then(ConfigLine::parent)
            .map(|parent| self.child_indices(parent))
            .unwrap_or_default()
    }

    fn ancestor_indices(&self, index: usize) -> Vec<usize> {
        let mut ancestors = Vec::new();
        let mut current = self.tree.line(index).and_then(ConfigLine::parent);
        // Parents always precede their children, so the walk terminates.
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.tree.line(parent).and_then(ConfigLine::parent);
        }
        ancestors
    }

    fn descendant_indices(&self, index: usize) -> Vec<usize> {
        let mut seen = BTreeSet::new();
        let mut stack = self.child_indices(index);
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend(self.child_indices(next));
            }
        }
        seen.into_iter().collect()
    }

    fn objects(&self, indices: Vec<usize>) -> Vec<&'t ConfigLine> {
        indices
            .into_iter()
            .filter_map(|i| self.tree.line(i))
            .collect()
    }

    fn to_lines(&self, indices: impl IntoIterator<Item = usize>) -> Vec<&'t str> {
        indices.into_iter().map(|i| self.tree.text(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{compile, Literal};
    use crate::tree::ParseOptions;

    const POLICY: &str = "\
policy-map QOS_1
 class GOLD
  priority percent 10
 class SILVER
  bandwidth 30
  random-detect
 class default
!
interface Serial1/0
 encapsulation ppp
 ip address 1.1.1.1 255.255.255.252
!
access-list 101 deny tcp any any eq 25 log
access-list 101 permit ip any any
";

    fn tree() -> ConfigTree {
        ConfigTree::from_text(POLICY, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn find_lines_greps() {
        let tree = tree();
        let q = tree.query();
        assert_eq!(
            q.find_lines(&compile("^access-list").unwrap()),
            vec![
                "access-list 101 deny tcp any any eq 25 log",
                "access-list 101 permit ip any any"
            ]
        );
        assert!(q.find_lines(&Literal::new("router")).is_empty());
    }

    #[test]
    fn find_children_one_level() {
        let tree = tree();
        let q = tree.query();
        assert_eq!(
            q.find_children(&compile("^policy-map").unwrap()),
            vec!["policy-map QOS_1", " class GOLD", " class SILVER", " class default"]
        );
    }

    #[test]
    fn find_all_children_descends() {
        let tree = tree();
        let q = tree.query();
        assert_eq!(
            q.find_all_children(&compile("^policy-map").unwrap()),
            vec![
                "policy-map QOS_1",
                " class GOLD",
                "  priority percent 10",
                " class SILVER",
                "  bandwidth 30",
                "  random-detect",
                " class default",
            ]
        );
    }

    #[test]
    fn find_all_children_excludes_sibling_descendants() {
        let tree = tree();
        let q = tree.query();
        assert_eq!(
            q.find_all_children(&compile("class SILVER").unwrap()),
            vec![" class SILVER", "  bandwidth 30", "  random-detect"]
        );
    }

    #[test]
    fn find_blocks_siblings_and_ancestors() {
        let tree = tree();
        let q = tree.query();
        assert_eq!(
            q.find_blocks(&compile("bandwidth").unwrap()),
            vec!["policy-map QOS_1", " class SILVER", "  bandwidth 30", "  random-detect"]
        );
    }

    #[test]
    fn find_blocks_root_line_alone() {
        let tree = tree();
        let q = tree.query();
        assert_eq!(
            q.find_blocks(&compile("permit ip").unwrap()),
            vec!["access-list 101 permit ip any any"]
        );
    }

    #[test]
    fn parents_with_child() {
        let tree = tree();
        let q = tree.query();
        let bandwidth = compile("bandwidth").unwrap();
        assert_eq!(
            q.find_parents_with_child(&compile("class").unwrap(), &bandwidth),
            vec![" class SILVER"]
        );
        assert_eq!(
            q.find_parents_with_child(&compile("policy").unwrap(), &bandwidth),
            vec!["policy-map QOS_1"]
        );
        assert!(q
            .find_parents_with_child(&compile("interface").unwrap(), &bandwidth)
            .is_empty());
    }

    #[test]
    fn parents_without_child() {
        let tree = tree();
        let q = tree.query();
        let interface = compile("^interface").unwrap();
        assert_eq!(
            q.find_parents_without_child(&interface, &compile("shutdown").unwrap()),
            vec!["interface Serial1/0"]
        );
        assert!(q
            .find_parents_without_child(&interface, &compile("encapsulation").unwrap())
            .is_empty());
    }

    #[test]
    fn parents_without_child_only_checks_families() {
        let tree = tree();
        let q = tree.query();
        // class GOLD is a parent but not an oldest ancestor
        let gold = compile("class GOLD").unwrap();
        assert!(q
            .find_parents_without_child(&gold, &compile("bandwidth").unwrap())
            .is_empty());
    }

    #[test]
    fn traversal_primitives() {
        let tree = tree();
        let q = tree.query();
        let idx = |lines: Vec<&ConfigLine>| lines.iter().map(|l| l.index()).collect::<Vec<_>>();

        assert_eq!(idx(q.children(0)), vec![1, 3, 6]);
        assert_eq!(idx(q.siblings(4)), vec![4, 5]);
        assert_eq!(idx(q.ancestors(5)), vec![3, 0]);
        assert_eq!(idx(q.descendants(0)), vec![1, 2, 3, 4, 5, 6]);
        assert!(q.siblings(0).is_empty());
        assert!(q.ancestors(0).is_empty());
        assert!(q.children(99).is_empty());
    }

    #[test]
    fn unique_sorts_and_dedups() {
        assert_eq!(unique([5, 1, 5, 3, 1]), vec![1, 3, 5]);
        assert!(unique(Vec::new()).is_empty());
    }
}
