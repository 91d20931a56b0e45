// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Minimal ordered tree.

/// Node carrying `info` and an ordered list of child branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode<T> {
    pub info: T,
    branches: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Leaf node.
    pub fn new(info: T) -> Self {
        Self {
            info,
            branches: Vec::new(),
        }
    }

    /// Append a child branch.
    pub fn add_branch(&mut self, branch: TreeNode<T>) {
        self.branches.push(branch);
    }

    /// Direct children, in insertion order.
    pub fn branches(&self) -> &[TreeNode<T>] {
        &self.branches
    }

    pub fn is_leaf(&self) -> bool {
        self.branches.is_empty()
    }

    /// Every descendant in pre-order (parent before its children). The node
    /// itself is not included.
    pub fn all_nodes(&self) -> Vec<&TreeNode<T>> {
        let mut nodes = Vec::new();
        let mut stack: Vec<&TreeNode<T>> = self.branches.iter().rev().collect();
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.branches.iter().rev());
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode<&'static str> {
        // root -> a -> (a1, a2), b
        let mut a = TreeNode::new("a");
        a.add_branch(TreeNode::new("a1"));
        a.add_branch(TreeNode::new("a2"));
        let mut root = TreeNode::new("root");
        root.add_branch(a);
        root.add_branch(TreeNode::new("b"));
        root
    }

    #[test]
    fn test_all_nodes_preorder_excludes_self() {
        let root = sample();
        let order: Vec<_> = root.all_nodes().iter().map(|n| n.info).collect();
        assert_eq!(order, vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_leaf_has_no_nodes() {
        let leaf = TreeNode::new(1u8);
        assert!(leaf.is_leaf());
        assert!(leaf.all_nodes().is_empty());
    }

    #[test]
    fn test_branches_keep_insertion_order() {
        let root = sample();
        let names: Vec<_> = root.branches().iter().map(|n| n.info).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
