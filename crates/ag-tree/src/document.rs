//! JSON round-trip of model trees.
//!
//! A document is the nested form of a tree: each node carries its type,
//! name, enabled flag, full property list (values plus units, description
//! and constraint metadata) and children.  Loading goes through the normal
//! `add_child` path, so every placement is re-validated and a document that
//! violates the parent registry fails to load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ModelNode, ModelSubtree, ModelTree, ModelType, Property, TreeError, TreeResult};
use ag_core::ModelId;

fn enabled_default() -> bool {
    true
}

/// Serialized form of one node and its descendants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,

    #[serde(rename = "type")]
    pub model_type: ModelType,

    #[serde(default = "enabled_default")]
    pub enabled: bool,

    #[serde(default)]
    pub properties: Vec<Property>,

    #[serde(default)]
    pub children: Vec<NodeDocument>,
}

impl NodeDocument {
    /// Rebuild a detached node: schema defaults first, then every stored
    /// property.  Known properties are assigned through validation; unknown
    /// ones are validated against their own stored rules and appended.
    fn to_node(&self, path: &str) -> TreeResult<ModelNode> {
        let mut node = ModelNode::new(self.model_type, self.name.clone());
        node.enabled = self.enabled;
        for property in &self.properties {
            let result = if node.property(&property.name).is_some() {
                node.set(&property.name, property.value().clone())
            } else {
                property.validate(property.value()).map(|()| node.add_property(property.clone()))
            };
            result.map_err(|source| TreeError::Validation { path: path.to_string(), source })?;
        }
        Ok(node)
    }

    fn from_node(tree: &ModelTree, id: ModelId, node: &ModelNode) -> Self {
        Self {
            name:       node.name.clone(),
            model_type: node.model_type,
            enabled:    node.enabled,
            properties: node.properties.clone(),
            children:   node
                .children
                .iter()
                .filter_map(|&c| tree.get(c).map(|n| Self::from_node(tree, c, n)))
                .collect(),
        }
    }
}

impl ModelTree {
    /// Nested document of the whole tree.
    pub fn to_document(&self) -> NodeDocument {
        let root = self.root();
        match self.get(root) {
            Some(node) => NodeDocument::from_node(self, root, node),
            None => NodeDocument {
                name:       String::new(),
                model_type: ModelType::Simulations,
                enabled:    true,
                properties: vec![],
                children:   vec![],
            },
        }
    }

    /// Rebuild a tree, validating every placement and property.
    pub fn from_document(doc: &NodeDocument) -> TreeResult<Self> {
        let root = doc.to_node(&format!(".{}", doc.name))?;
        let mut tree = ModelTree::new(root);
        let root_id = tree.root();
        for child in &doc.children {
            build(&mut tree, root_id, child)?;
        }
        Ok(tree)
    }

    pub fn to_json(&self) -> TreeResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> TreeResult<Self> {
        let doc: NodeDocument = serde_json::from_str(json)?;
        Self::from_document(&doc)
    }

    pub fn save(&self, path: &Path) -> TreeResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> TreeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl ModelSubtree {
    /// Detached nodes from a document snippet.  Placement inside the snippet
    /// is checked when the subtree is attached.
    pub fn from_document(doc: &NodeDocument) -> TreeResult<Self> {
        let mut subtree = ModelSubtree::single(doc.to_node(&doc.name)?);
        push_children(&mut subtree, 0, doc, &doc.name)?;
        Ok(subtree)
    }
}

fn build(tree: &mut ModelTree, parent: ModelId, doc: &NodeDocument) -> TreeResult<()> {
    let node = doc.to_node(&format!("{}.{}", tree.path(parent), doc.name))?;
    let id = tree.add_child(parent, node)?;
    for child in &doc.children {
        build(tree, id, child)?;
    }
    Ok(())
}

fn push_children(subtree: &mut ModelSubtree, index: usize, doc: &NodeDocument, path: &str) -> TreeResult<()> {
    for child in &doc.children {
        let child_path = format!("{path}.{}", child.name);
        let child_index = subtree.push(index, child.to_node(&child_path)?);
        push_children(subtree, child_index, child, &child_path)?;
    }
    Ok(())
}
