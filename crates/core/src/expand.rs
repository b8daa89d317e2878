use crate::converter::Value;
use crate::node::Node;

/// One way of reading a sequence of fragments against the tree.
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    /// Expanded keywords and converted values, one per step.
    pub path: Vec<Value>,
    /// The node reached at each step, parallel to `path`.
    pub nodes: Vec<&'a Node>,
}

impl<'a> Expansion<'a> {
    /// The node the expansion ends at, if it took any step.
    #[must_use]
    pub fn last(&self) -> Option<&'a Node> {
        self.nodes.last().copied()
    }

    fn extended(&self, value: Value, node: &'a Node) -> Self {
        let mut path = self.path.clone();
        path.push(value);
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        Self { path, nodes }
    }
}

/// Expands a sequence of typed fragments into every possible full command.
///
/// A dead end anywhere yields nothing. An ambiguous step stops the walk and
/// returns each ambiguous continuation; later fragments are ignored. When all
/// fragments resolve and `lookahead` is set, every legal next token is
/// returned too, along with the current path itself if it is a complete
/// command.
#[must_use]
pub fn expand<'a, S: AsRef<str>>(
    root: &'a Node,
    fragments: &[S],
    lookahead: bool,
) -> Vec<Expansion<'a>> {
    let mut current = Expansion {
        path: Vec::new(),
        nodes: Vec::new(),
    };
    let mut node = root;

    for fragment in fragments {
        let mut matches = node.match_fragment(fragment.as_ref());
        match matches.len() {
            0 => return Vec::new(),
            1 => {
                let (value, next) = matches.remove(0);
                current.path.push(value);
                current.nodes.push(next);
                node = next;
            }
            _ => {
                return matches
                    .into_iter()
                    .map(|(value, next)| current.extended(value, next))
                    .collect();
            }
        }
    }

    if lookahead {
        let mut expansions: Vec<Expansion<'a>> = node
            .match_fragment("")
            .into_iter()
            .map(|(value, next)| current.extended(value, next))
            .collect();
        if node.handler().is_some() {
            expansions.push(current);
        }
        return expansions;
    }

    if current.path.is_empty() {
        return Vec::new();
    }

    vec![current]
}
