//! # Tree Command Implementation
//!
//! Displays the configuration as a tree: directories nested under the
//! directories they are defined relative to, with their bound members, and
//! the groups that are not implied by a directory, with their members
//! expanded recursively.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};
use std::borrow::Cow;
use std::collections::HashSet;

use super::ConfigArgs;
use devroute::config::ParseOptions;
use devroute::group::Member;
use devroute::name::PackageName;
use devroute::registry::Registry;

/// Display directories and groups as a tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs) -> Result<()> {
    let session = args.config.load_session(ParseOptions::default())?;
    let root = build_tree(session.registry());
    print_tree(&root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
    Ok(())
}

/// Build the whole display tree for a registry.
fn build_tree(registry: &Registry) -> TreeNode {
    let directories = registry
        .directories()
        .filter(|directory| directory.definition().base().is_none())
        .map(|directory| directory_node(registry, directory.name()))
        .collect();

    let groups = registry
        .groups()
        .filter(|group| registry.get_directory(group.name()).is_none())
        .map(|group| {
            let mut seen = HashSet::new();
            seen.insert(group.name().clone());
            group_node(registry, group.name(), &mut seen)
        })
        .collect();

    TreeNode::new(
        "devroute",
        vec![
            TreeNode::new("directories", directories),
            TreeNode::new("groups", groups),
        ],
    )
}

fn directory_node(registry: &Registry, name: &PackageName) -> TreeNode {
    let path = registry
        .directory_path(name)
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let mut children: Vec<TreeNode> = registry
        .directories()
        .filter(|child| child.definition().base() == Some(name))
        .map(|child| directory_node(registry, child.name()))
        .collect();
    children.extend(
        registry
            .directory_members(name)
            .iter()
            .map(|member| TreeNode::leaf(member_label(member))),
    );

    TreeNode::new(format!("+{} {}", name, path), children)
}

fn group_node(registry: &Registry, name: &PackageName, seen: &mut HashSet<PackageName>) -> TreeNode {
    let members = registry
        .get_group(name)
        .map(|group| group.members().to_vec())
        .unwrap_or_default();

    let children = members
        .iter()
        .map(|member| match member {
            Member::Group(inner) if seen.insert(inner.clone()) => {
                let mut node = group_node(registry, inner, &mut *seen);
                node.label = member_label(member);
                node
            }
            _ => TreeNode::leaf(member_label(member)),
        })
        .collect();

    TreeNode::new(format!("={}", name), children)
}

fn member_label(member: &Member) -> String {
    match member {
        Member::Package(name) => name.to_string(),
        Member::Group(name) => format!("={}", name),
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone, Debug, PartialEq)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn new<L: Into<String>>(label: L, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    fn leaf<L: Into<String>>(label: L) -> Self {
        Self::new(label, vec![])
    }
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
