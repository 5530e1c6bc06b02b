//! Terminal rendering of a tree diff.

use colored::{ColoredString, Colorize};
use serde_json::Value;
use similar::{ChangeTag, TextDiff};

use treediffer_diff::{AttributeDiff, Attributes, DiffEntry, ModifiedNode, TreeDiff};

/// String values at least this long are shown as a word diff.
const WORD_DIFF_MIN_LEN: usize = 40;

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn attr_text<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    let attr = attrs.get(name)?;
    attr.value.as_ref().or(attr.old_value.as_ref())?.as_str()
}

/// `Title [kind] (id)`, leaving out whatever the record does not carry.
fn label(id: &str, attrs: &Attributes) -> String {
    let mut parts = Vec::new();
    if let Some(title) = attr_text(attrs, "title") {
        parts.push(title.to_string());
    }
    if let Some(kind) = attr_text(attrs, "kind_id").or_else(|| attr_text(attrs, "kind")) {
        parts.push(format!("[{kind}]"));
    }
    parts.push(format!("({id})"));
    parts.join(" ")
}

fn push_tree<E: DiffEntry>(
    lines: &mut Vec<String>,
    entry: &E,
    depth: usize,
    line: &dyn Fn(&E) -> String,
) {
    lines.push(format!("{}{}", indent(depth), line(entry)));
    for child in entry.children() {
        push_tree(lines, child, depth + 1, line);
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

fn compact_list(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(compact).collect();
    format!("[{}]", items.join(", "))
}

fn word_diff(p: &Painter, old: &str, new: &str) -> String {
    TextDiff::from_words(old, new)
        .iter_all_changes()
        .map(|change| match change.tag() {
            ChangeTag::Equal => change.value().to_string(),
            ChangeTag::Delete => p.paint(&format!("[-{}-]", change.value()), |s| s.red()),
            ChangeTag::Insert => p.paint(&format!("{{+{}+}}", change.value()), |s| s.green()),
        })
        .collect()
}

fn describe_change(p: &Painter, diff: &AttributeDiff) -> String {
    let mut parts = Vec::new();
    if let Some(added) = diff.added.as_deref().filter(|a| !a.is_empty()) {
        parts.push(p.paint(&format!("+{}", compact_list(added)), |s| s.green()));
    }
    if let Some(deleted) = diff.deleted.as_deref().filter(|d| !d.is_empty()) {
        parts.push(p.paint(&format!("-{}", compact_list(deleted)), |s| s.red()));
    }
    if let Some(moved) = diff.moved.as_deref().filter(|m| !m.is_empty()) {
        parts.push(p.paint(&format!("{} moved", moved.len()), |s| s.yellow()));
    }
    if let Some(modified) = diff.modified.as_deref().filter(|m| !m.is_empty()) {
        parts.push(p.paint(&format!("{} modified", modified.len()), |s| s.cyan()));
    }
    if !parts.is_empty() {
        return parts.join(" ");
    }

    match (&diff.old_value, &diff.value) {
        (Some(Value::String(old)), Some(Value::String(new)))
            if old.len().max(new.len()) >= WORD_DIFF_MIN_LEN =>
        {
            word_diff(p, old, new)
        }
        (Some(old), Some(new)) => format!(
            "{} -> {}",
            p.paint(&compact(old), |s| s.red()),
            p.paint(&compact(new), |s| s.green())
        ),
        (None, Some(new)) => format!("(added) {}", p.paint(&compact(new), |s| s.green())),
        (Some(old), None) => format!("(deleted) {}", p.paint(&compact(old), |s| s.red())),
        (None, None) => String::new(),
    }
}

fn push_modified(lines: &mut Vec<String>, p: &Painter, node: &ModifiedNode) {
    let parent = node.parent_id.as_deref().unwrap_or("-");
    lines.push(format!(
        "  {} {} (parent {parent})",
        p.paint("*", |s| s.cyan()),
        node.node_id
    ));
    for (name, diff) in &node.attributes {
        lines.push(format!("      {}: {}", p.paint(name, |s| s.bold()), describe_change(p, diff)));
    }
}

fn heading(lines: &mut Vec<String>, p: &Painter, title: &str) {
    lines.push(String::new());
    lines.push(p.paint(title, |s| s.bold()));
}

/// Render `diff` as text. Nested records (restructured format) are indented
/// under their parents.
pub fn render_text(diff: &TreeDiff, color: bool) -> String {
    let p = Painter { color };
    let mut lines = vec![
        p.paint("SUMMARY", |s| s.bold()),
        format!(
            "  added: {}  deleted: {}  moved: {}  modified: {}",
            diff.added_count(),
            diff.deleted_count(),
            diff.moved_count(),
            diff.modified_count()
        ),
    ];
    if diff.is_empty() {
        lines.push("  No changes.".to_string());
    }

    if !diff.nodes_added.is_empty() {
        heading(&mut lines, &p, "ADDED");
        let line = |n: &treediffer_diff::AddedNode| {
            format!("{} {}", p.paint("+", |s| s.green()), label(&n.node_id, &n.attributes))
        };
        for node in &diff.nodes_added {
            push_tree(&mut lines, node, 1, &line);
        }
    }

    if !diff.nodes_deleted.is_empty() {
        heading(&mut lines, &p, "DELETED");
        let line = |n: &treediffer_diff::DeletedNode| {
            format!("{} {}", p.paint("-", |s| s.red()), label(&n.old_node_id, &n.attributes))
        };
        for node in &diff.nodes_deleted {
            push_tree(&mut lines, node, 1, &line);
        }
    }

    if !diff.nodes_moved.is_empty() {
        heading(&mut lines, &p, "MOVED");
        let line = |n: &treediffer_diff::MovedNode| {
            format!(
                "{} {} from {}#{} to {}#{}",
                p.paint("~", |s| s.yellow()),
                label(&n.node_id, &n.attributes),
                n.old_parent_id.as_deref().unwrap_or("-"),
                n.old_sort_order,
                n.parent_id.as_deref().unwrap_or("-"),
                n.sort_order
            )
        };
        for node in &diff.nodes_moved {
            push_tree(&mut lines, node, 1, &line);
        }
    }

    if !diff.nodes_modified.is_empty() {
        heading(&mut lines, &p, "MODIFIED");
        for node in &diff.nodes_modified {
            push_modified(&mut lines, &p, node);
        }
    }

    if !diff.warnings.is_empty() {
        heading(&mut lines, &p, "WARNINGS");
        for warning in &diff.warnings {
            lines.push(format!("  {} {warning}", p.paint("!", |s| s.yellow())));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
