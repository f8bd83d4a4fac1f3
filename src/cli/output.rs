//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Cluster, Collection, Metrics};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark) to stderr, keeping stdout for data
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data such as exported JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print prompt without newline (cyan)
pub fn prompt(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{} ", msg.to_string().cyan());
    std::io::stdout().flush().ok();
}

/// One line per metric.
pub fn metrics(metrics: &Metrics) {
    header("Metrics");
    detail(&format!("Total clusters:      {}", metrics.total_clusters));
    detail(&format!("Total members:       {}", metrics.total_members));
    detail(&format!("Avg members/cluster: {:.2}", metrics.avg_members_per_cluster));
    detail(&format!("Relationships:       {}", metrics.total_relationships));
}

/// `Name (ID: id) - n members`
pub fn cluster_label(cluster: &Cluster) -> String {
    format!(
        "{} (ID: {}) - {} members",
        cluster.name,
        cluster.id,
        cluster.members.len()
    )
}

/// Tree of clusters with their members and resolved relationships.
///
/// Relationships pointing at unknown clusters are listed without a name.
pub fn cluster_tree(collection: &Collection, clusters: &[&Cluster]) -> Tree<String> {
    let mut root = Tree::new(format!("{} clusters", clusters.len()));
    for cluster in clusters {
        let mut node = Tree::new(cluster_label(cluster));

        let mut members = Tree::new("members".to_string());
        for member in &cluster.members {
            let mut label = format!("{} (ID: {})", member.name, member.id);
            if let Some(meta) = member.metadata.as_ref().filter(|m| !m.is_empty()) {
                let pairs = meta.iter().map(|(k, v)| format!("{k}={v}")).join(", ");
                label.push_str(&format!(" [{pairs}]"));
            }
            members.push(Tree::new(label));
        }
        node.push(members);

        let mut relationships = Tree::new("relationships".to_string());
        if cluster.relationships.is_empty() {
            relationships.push(Tree::new("none".to_string()));
        }
        for rel in &cluster.relationships {
            let label = match collection.get(rel) {
                Some(related) => format!("{} (ID: {})", related.name, rel),
                None => format!("(ID: {rel})"),
            };
            relationships.push(Tree::new(label));
        }
        node.push(relationships);

        root.push(node);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Member;

    #[test]
    fn given_collection_when_rendering_tree_then_resolves_relationship_names() {
        let collection = Collection::new(vec![
            Cluster::new("a", "Alpha")
                .with_members(vec![Member::new("m1", "Ann").with_metadata("role", "Dev")])
                .with_relationships(["b", "gone"]),
            Cluster::new("b", "Beta"),
        ]);
        let clusters: Vec<&Cluster> = collection.clusters.iter().collect();

        let text = cluster_tree(&collection, &clusters).to_string();

        assert!(text.contains("Alpha (ID: a) - 1 members"));
        assert!(text.contains("Ann (ID: m1) [role=Dev]"));
        assert!(text.contains("Beta (ID: b)"));
        assert!(text.contains("(ID: gone)"));
        assert!(text.contains("none"));
    }
}
