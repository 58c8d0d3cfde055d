use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::error::AtlasError;
use crate::metadata::Node;

const FILE_TREES: [&str; 2] = ["matrices", "contributedAnalyses"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: Vec<String>,
    pub name: String,
    pub url: String,
}

/// Collects the AnnData (`.h5ad`) files listed in a project's matrix trees.
///
/// A matrix tree nests facet mappings (species, stage, organ, ...) down to
/// lists of file records. URLs are de-duplicated across both trees.
pub fn download_plan(project: &str, document: &Node) -> Result<Vec<FileEntry>, AtlasError> {
    let record = project_record(document);
    let mut seen = HashSet::new();
    let mut plan = Vec::new();

    for key in FILE_TREES {
        let Some(tree) = record.get(key) else {
            continue;
        };
        let mut files = Vec::new();
        walk_file_tree(project, tree, &mut vec![key.to_string()], &mut files)?;

        for (path, file) in files {
            let (Some(name), Some(url)) = (file.get_str("name"), file.get_str("url")) else {
                warn!(project, path = %path.join("/"), "skipping file record without name or url");
                continue;
            };
            if !name.contains(".h5ad") {
                continue;
            }
            if seen.insert(url.to_string()) {
                plan.push(FileEntry {
                    path,
                    name: name.to_string(),
                    url: direct_url(url),
                });
            }
        }
    }
    Ok(plan)
}

// Index responses wrap the project under a one-element `projects` list.
fn project_record(document: &Node) -> &Node {
    document
        .get("projects")
        .and_then(Node::as_sequence)
        .and_then(<[Node]>::first)
        .unwrap_or(document)
}

fn walk_file_tree<'a>(
    project: &str,
    tree: &'a Node,
    path: &mut Vec<String>,
    files: &mut Vec<(Vec<String>, &'a Node)>,
) -> Result<(), AtlasError> {
    match tree {
        Node::Mapping(entries) => {
            for (key, child) in entries {
                path.push(key.clone());
                walk_file_tree(project, child, path, files)?;
                path.pop();
            }
        }
        Node::Sequence(items) => {
            files.extend(items.iter().map(|item| (path.clone(), item)));
        }
        Node::Scalar(_) => {
            return Err(AtlasError::MalformedFileTree {
                project: project.to_string(),
                path: path.join("/"),
            });
        }
    }
    Ok(())
}

// The `/fetch` endpoint answers with a redirect document instead of the file.
fn direct_url(url: &str) -> String {
    url.replace("/fetch", "")
}
