//! ASCII tree rendering of requirement trees.
//!
//! Depth is encoded as one 3-character column per level: `|  ` for a
//! pipe running through to a later sibling, three blanks once the
//! ancestor has no more children, `|--` for a branch, and `\--` for the
//! last branch under a node. Compound nodes print a short signifier;
//! constraint leaves print their canonical text form.
//!
//! ```text
//! and
//! |--()
//! |  \--or
//! |     |--identifier "com.apple.Safari"
//! |     \--anchor apple
//! \--!
//!    \--cdhash H"d5800a216ffd83b116b7b0f6047cb7f570f49329"
//! ```
//!
//! The walk threads the current depth and the set of ancestor depths
//! that still have an open pipe column; no output patching is needed.

use std::collections::BTreeSet;

use crate::ast::requirement::Requirement;

/// Render a requirement as an ASCII tree, one node per line.
pub fn render_tree(requirement: &Requirement) -> String {
    let mut output = String::new();
    let mut open = BTreeSet::new();
    render_node(requirement, 0, &mut open, true, &mut output);
    output
}

/// The one-line header a node contributes to the tree.
pub(crate) fn node_signifier(requirement: &Requirement) -> String {
    match requirement {
        Requirement::And(_) => "and".to_string(),
        Requirement::Or(_) => "or".to_string(),
        Requirement::Negation(_) => "!".to_string(),
        Requirement::Parentheses(_) => "()".to_string(),
        leaf => leaf.text_form(),
    }
}

/// The depth-column prefix for a line at `depth`. `open` holds the
/// ancestor depths whose pipe column is still running.
pub(crate) fn branch_prefix(depth: usize, open: &BTreeSet<usize>, is_last: bool) -> String {
    let mut prefix = String::new();
    for level in 1..depth {
        prefix.push_str(if open.contains(&level) { "|  " } else { "   " });
    }
    if depth > 0 {
        prefix.push_str(if is_last { "\\--" } else { "|--" });
    }
    prefix
}

fn render_node(
    requirement: &Requirement,
    depth: usize,
    open: &mut BTreeSet<usize>,
    is_last: bool,
    output: &mut String,
) {
    output.push_str(&branch_prefix(depth, open, is_last));
    output.push_str(&node_signifier(requirement));
    output.push('\n');

    let children = requirement.children();
    let count = children.len();
    for (index, child) in children.into_iter().enumerate() {
        let child_is_last = index + 1 == count;
        if !child_is_last {
            open.insert(depth + 1);
        }
        render_node(child, depth + 1, open, child_is_last, output);
        open.remove(&(depth + 1));
    }
}
