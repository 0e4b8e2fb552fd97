//! # Bracketed Tree Parser
//!
//! Reads constituency trees written one per line in the Penn bracketed
//! notation, e.g. `(3 (2 It) (4 (2 's) (3 good)))`, where every node
//! carries a label and leaves are bare tokens.

use crate::error::{Result, SentitreeError};

/// Deepest nesting accepted by [`Tree::parse`].
pub const MAX_DEPTH: usize = 512;

/// A labeled tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    label: String,
    children: Vec<Node>,
}

/// A child of a tree node: either a nested tree or a leaf token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Tree(Tree),
    Leaf(String),
}

impl Tree {
    /// Parse a single bracketed tree.
    ///
    /// # Examples
    /// ```
    /// use sentitree_core::parser::Tree;
    ///
    /// let tree = Tree::parse("(3 (2 It) (4 works))").unwrap();
    /// assert_eq!(tree.label(), "3");
    /// assert_eq!(tree.leaves(), vec!["It", "works"]);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let mut cursor = Cursor { input, pos: 0 };

        cursor.skip_whitespace();
        match cursor.peek() {
            None => return Err(cursor.error("empty input")),
            Some('(') => {}
            Some(_) => return Err(cursor.error("expected '(' at start of tree")),
        }

        let tree = cursor.parse_node(1)?;

        cursor.skip_whitespace();
        if cursor.peek().is_some() {
            return Err(cursor.error("trailing content after root node"));
        }

        Ok(tree)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Leaf tokens, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Tree(tree) => tree.collect_leaves(out),
                Node::Leaf(token) => out.push(token),
            }
        }
    }

    /// Every node of the tree in pre-order, starting with `self`.
    pub fn subtrees(&self) -> Subtrees<'_> {
        Subtrees { stack: vec![self] }
    }
}

/// Pre-order iterator over the nodes of a [`Tree`].
#[derive(Debug)]
pub struct Subtrees<'a> {
    stack: Vec<&'a Tree>,
}

impl<'a> Iterator for Subtrees<'a> {
    type Item = &'a Tree;

    fn next(&mut self) -> Option<&'a Tree> {
        let tree = self.stack.pop()?;
        self.stack
            .extend(tree.children.iter().rev().filter_map(|child| match child {
                Node::Tree(sub) => Some(sub),
                Node::Leaf(_) => None,
            }));
        Some(tree)
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn read_atom(&mut self) -> &'a str {
        let rest = &self.input[self.pos..];
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Parses a node whose opening parenthesis is at the cursor.
    fn parse_node(&mut self, depth: usize) -> Result<Tree> {
        if depth > MAX_DEPTH {
            return Err(self.error("tree nested too deeply"));
        }
        self.pos += 1;
        self.skip_whitespace();

        let label = self.read_atom();
        if label.is_empty() {
            return Err(self.error("missing node label"));
        }

        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error("unbalanced parentheses: missing ')'")),
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some('(') => children.push(Node::Tree(self.parse_node(depth + 1)?)),
                Some(_) => children.push(Node::Leaf(self.read_atom().to_string())),
            }
        }

        Ok(Tree {
            label: label.to_string(),
            children,
        })
    }

    fn error(&self, reason: &str) -> SentitreeError {
        SentitreeError::MalformedTree {
            position: self.pos,
            reason: reason.to_string(),
        }
    }
}

/// Parse one treebank line into `(leaves, label)` pairs.
///
/// Yields the root only, or every subtree in pre-order when `subtrees` is
/// set.
pub fn parse_line_tree(line: &str, subtrees: bool) -> Result<Vec<(Vec<String>, String)>> {
    let tree = Tree::parse(line)?;

    let pair = |t: &Tree| -> (Vec<String>, String) {
        (
            t.leaves().into_iter().map(String::from).collect(),
            t.label.clone(),
        )
    };

    if subtrees {
        Ok(tree.subtrees().map(pair).collect())
    } else {
        Ok(vec![pair(&tree)])
    }
}
