//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use archivehub_entity::folder::TreeNode;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print a single row in the selected format
pub fn print_item<T: Serialize + Tabled>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", Table::new(std::iter::once(item))),
        OutputFormat::Json => print_json(item),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a folder forest
pub fn print_tree(nodes: &[TreeNode], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(nodes),
        OutputFormat::Table => {
            if nodes.is_empty() {
                println!("No visible folders.");
                return;
            }
            let mut lines = Vec::new();
            for node in nodes {
                render_tree(node, 0, &mut lines);
            }
            println!("{}", lines.join("\n"));
        }
    }
}

fn render_tree(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let labels = if node.folder.group_permission.is_empty() {
        "open".to_string()
    } else {
        node.folder.group_permission.to_string()
    };
    lines.push(format!(
        "{indent}{}/ [#{}] ({labels})",
        node.folder.name, node.folder.id
    ));
    for record in &node.records {
        lines.push(format!(
            "{indent}  - {} {} [{}]",
            record.contract_no, record.title, record.borrow_state
        ));
    }
    for child in &node.children {
        render_tree(child, depth + 1, lines);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
