//! Graphviz DOT rendering for decision trees.

use std::fmt::Write;

use grove_forest::{DecisionTree, Node};

/// Render a decision tree as a Graphviz digraph.
///
/// One node declaration per tree node (leaves labeled with their target
/// value, split nodes labeled blank) and one edge per parent/child pair
/// labeled `attribute=value`. Declarations follow the arena's pre-order, but
/// the graph is the same under any traversal order.
#[must_use]
pub fn render_dot(tree: &DecisionTree) -> String {
    let mut out = String::from("digraph decision_tree {\n");
    for (index, node) in tree.nodes().iter().enumerate() {
        let label = match node {
            Node::Leaf { target } => escape(target),
            Node::Split { .. } => String::new(),
        };
        writeln!(out, "    n{index} [label=\"{label}\"];").expect("writing to a String cannot fail");
    }
    for (index, node) in tree.nodes().iter().enumerate() {
        if let Node::Split {
            attribute,
            children,
        } = node
        {
            for (value, child) in children {
                writeln!(
                    out,
                    "    n{index} -> n{} [label=\"{}\"];",
                    child.index(),
                    escape(&format!("{attribute}={value}")),
                )
                .expect("writing to a String cannot fail");
            }
        }
    }
    out.push_str("}\n");
    out
}

/// Escape backslashes and double quotes for use inside a DOT label.
fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
