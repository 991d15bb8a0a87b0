//! Builds the hierarchical tree the code viewer renders from a project's
//! flat file list.

use serde::{Deserialize, Serialize};

use crate::models::project::ProjectFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A node of the viewer tree. Folder nodes carry children; file nodes carry
/// the language and content of the uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Full path from the project root, `/`-joined.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    fn folder(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Folder,
            path,
            language: None,
            content: None,
            children: Some(Vec::new()),
        }
    }

    fn file(name: &str, path: String, language: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::File,
            path,
            language: Some(language.to_string()),
            content: Some(content.to_string()),
            children: None,
        }
    }
}

/// Build a tree from flat `{path, language, content}` records.
///
/// Each path is split on `/`; intermediate segments become folder nodes,
/// the terminal segment a file node. A segment that already exists is
/// reused, so the same path always maps to the same node and the first
/// occurrence of a duplicate file path wins; later duplicates are ignored.
/// Runs in O(total path segments).
pub fn build_file_tree(files: &[ProjectFile]) -> TreeNode {
    let mut root = TreeNode {
        name: "root".to_string(),
        kind: NodeKind::Folder,
        path: String::new(),
        language: None,
        content: None,
        children: Some(Vec::new()),
    };

    for file in files {
        let parts: Vec<&str> = file.path.split('/').collect();
        let mut current = &mut root;

        for (index, part) in parts.iter().enumerate() {
            let is_file = index == parts.len() - 1;
            let node_path = parts[..=index].join("/");

            let children = current.children.get_or_insert_with(Vec::new);
            let position = children.iter().position(|child| child.name == *part);

            let position = match position {
                Some(pos) => pos,
                None => {
                    let node = if is_file {
                        TreeNode::file(part, node_path, &file.language, &file.content)
                    } else {
                        TreeNode::folder(part, node_path)
                    };
                    children.push(node);
                    children.len() - 1
                }
            };

            current = &mut current.children.as_mut().expect("children just ensured")[position];
        }
    }

    root
}

/// Locate a file node by its full path. Folders never match.
pub fn find_file_in_tree<'a>(tree: &'a TreeNode, path: &str) -> Option<&'a TreeNode> {
    if tree.kind == NodeKind::File && tree.path == path {
        return Some(tree);
    }
    tree.children
        .as_ref()?
        .iter()
        .find_map(|child| find_file_in_tree(child, path))
}
