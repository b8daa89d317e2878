// Command tree implementation.
//
// When a command is installed it is stored in a prefix tree.
//
//     show ip connections
//     show ip interfaces
//     show ip routes
//     show system
//     show system detail
//     show system inventory
//
//     show─┬─ip─┬─connections*
//          │    ├─interfaces*
//          │    └─routes*
//          └─system*─┬─detail*
//                    └─inventory*
//
//     (* marks a command endpoint)
//
// Alternation groups create a branch per alternative:
//
//     foo (bar | baz)
//
//     foo─┬─bar*
//         └─baz*
//
// Permutation groups create a branch per ordered subset:
//
//     foo {bar | baz}
//
//     foo─┬─bar*──baz*
//         └─baz*──bar*

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::rc::Rc;

use itertools::Itertools;

use crate::converter::Value;
use crate::element::{Element, Group, GroupKind, Token};
use crate::error::{Error, Result};
use crate::handler::Handler;

#[derive(Debug, Clone)]
pub struct Node {
    element: Rc<Element>,
    handler: Option<Handler>,
    children: BTreeMap<String, Node>,
    hidden: bool,
}

impl Node {
    #[must_use]
    pub fn new(element: Rc<Element>) -> Self {
        Self {
            element,
            handler: None,
            children: BTreeMap::new(),
            hidden: false,
        }
    }

    #[must_use]
    pub fn root() -> Self {
        Self::new(Rc::new(Element::root()))
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.element.keyword
    }

    #[must_use]
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Only reached through hidden commands; left out of help and completion.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn child(&self, keyword: &str) -> Option<&Node> {
        self.children.get(keyword)
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    /// Follows exact keywords down the tree.
    #[must_use]
    pub fn lookup(&self, keywords: &[&str]) -> Option<&Node> {
        keywords
            .iter()
            .try_fold(self, |node, keyword| node.child(keyword))
    }

    /// Expands or converts a fragment against this node's element.
    ///
    /// Returns the full keyword when the fragment abbreviates it, the
    /// converted value when the converter accepts it, and `None` otherwise.
    #[must_use]
    pub fn parse(&self, fragment: &str) -> Option<Value> {
        if self.keyword().starts_with(fragment) {
            return Some(Value::word(self.keyword()));
        }

        self.element
            .converter
            .as_ref()
            .and_then(|converter| converter.apply(fragment))
    }

    /// Finds every continuation of this node that `fragment` can stand for.
    ///
    /// An exact keyword wins outright. A vararg node matches itself before
    /// looking at its children. Otherwise each child is tried by prefix and by
    /// converter; more than one result means the fragment is ambiguous here.
    #[must_use]
    pub fn match_fragment(&self, fragment: &str) -> Vec<(Value, &Node)> {
        if let Some(node) = self.children.get(fragment) {
            return vec![(Value::word(fragment), node)];
        }

        if self.element.is_recursive {
            if let Some(value) = self.parse(fragment) {
                return vec![(value, self)];
            }
        }

        self.children
            .values()
            .filter_map(|node| node.parse(fragment).map(|value| (value, node)))
            .collect()
    }

    /// Installs a compiled command below this node.
    ///
    /// `handler` is attached at every endpoint the tokens expand to, replacing
    /// any handler already at an identical path.
    pub fn build(&mut self, tokens: &[Token], handler: &Handler, hidden: bool) {
        let tokens: Vec<&Token> = tokens.iter().collect();
        self.build_path(&tokens, handler, hidden);
    }

    fn build_path(&mut self, tokens: &[&Token], handler: &Handler, hidden: bool) {
        let mut node = self;

        for (i, &token) in tokens.iter().enumerate() {
            match token {
                Token::Element(element) => {
                    node = node
                        .children
                        .entry(element.keyword.clone())
                        .and_modify(|child| child.hidden &= hidden)
                        .or_insert_with(|| {
                            let mut child = Node::new(Rc::clone(element));
                            child.hidden = hidden;
                            child
                        });
                }
                Token::Group(group) => {
                    let rest = &tokens[i + 1..];
                    for mut path in arrangements(group) {
                        path.extend_from_slice(rest);
                        node.build_path(&path, handler, hidden);
                    }
                    return;
                }
            }
        }

        node.handler = Some(handler.clone());
    }

    /// Recursively folds `source` into this node.
    ///
    /// A handler in `source` replaces ours; children only we have are kept,
    /// children only `source` has are adopted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootMismatch`] if the two nodes have different keywords.
    pub fn merge(&mut self, source: Node) -> Result<()> {
        if self.keyword() != source.keyword() {
            return Err(Error::RootMismatch {
                target_keyword: self.keyword().to_string(),
                source_keyword: source.keyword().to_string(),
            });
        }

        if source.handler.is_some() {
            self.handler = source.handler;
        }
        self.hidden &= source.hidden;

        for (keyword, child) in source.children {
            match self.children.entry(keyword) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(child)?,
                Entry::Vacant(entry) => {
                    entry.insert(child);
                }
            }
        }

        Ok(())
    }
}

/// Every linear token sequence a group can stand for.
fn arrangements(group: &Group) -> Vec<Vec<&Token>> {
    match group.kind {
        GroupKind::Alternation => group
            .branches
            .iter()
            .map(|branch| branch.iter().collect())
            .collect(),
        GroupKind::Permutation => (1..=group.branches.len())
            .flat_map(|size| group.branches.iter().permutations(size))
            .map(|branches| branches.into_iter().flatten().collect())
            .collect(),
    }
}
