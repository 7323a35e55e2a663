// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task catalog tree.
//!
//! A catalog is a tree of named nodes parsed from a TOML document. Interior
//! nodes group related tasks; leaves carry a numeric payload (an estimate in
//! hours). Key order follows the source document so menus render in the
//! order the author wrote them.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::TempoError;

/// One node of a task catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogNode {
    /// A terminal task with its numeric payload.
    Leaf(f64),
    /// A named group of child nodes, in document order.
    Branch(Vec<(String, CatalogNode)>),
}

impl CatalogNode {
    /// Parse a catalog from TOML source.
    ///
    /// The document root must be a table; an empty or scalar-only root is
    /// rejected since it cannot populate a menu.
    pub fn from_toml_str(raw: &str) -> Result<Self, TempoError> {
        let node: CatalogNode =
            toml::from_str(raw).map_err(|e| TempoError::Catalog(e.to_string()))?;
        match &node {
            CatalogNode::Branch(entries) if !entries.is_empty() => Ok(node),
            CatalogNode::Branch(_) => Err(TempoError::Catalog(
                "task catalog is empty".to_string(),
            )),
            CatalogNode::Leaf(_) => Err(TempoError::Catalog(
                "task catalog root must be a table".to_string(),
            )),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, CatalogNode::Leaf(_))
    }

    /// Child keys of a branch, in document order. Empty for leaves.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            CatalogNode::Leaf(_) => Vec::new(),
            CatalogNode::Branch(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
        }
    }

    /// Resolve a selection against this node's children.
    ///
    /// Selection identifiers travel over a transport that truncates them, so
    /// an exact match is tried first and a unique-by-order prefix match
    /// second. Returns the child node together with the full (untruncated)
    /// key. Fails without side effects when nothing matches.
    pub fn descend(&self, selection: &str) -> Result<(&CatalogNode, &str), TempoError> {
        let entries = match self {
            CatalogNode::Branch(entries) => entries,
            CatalogNode::Leaf(_) => {
                return Err(TempoError::SelectionNotFound {
                    key: selection.to_string(),
                });
            }
        };
        if let Some((key, node)) = entries.iter().find(|(k, _)| k == selection) {
            return Ok((node, key.as_str()));
        }
        // Truncated identifier: first key the selection is a prefix of wins.
        entries
            .iter()
            .find(|(k, _)| k.starts_with(selection))
            .map(|(key, node)| (node, key.as_str()))
            .ok_or_else(|| TempoError::SelectionNotFound {
                key: selection.to_string(),
            })
    }

    /// Depth-first list of all leaf tasks with their workloads.
    pub fn leaves(&self) -> Vec<(&str, f64)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, f64)>) {
        if let CatalogNode::Branch(entries) = self {
            for (key, node) in entries {
                match node {
                    CatalogNode::Leaf(workload) => out.push((key.as_str(), *workload)),
                    CatalogNode::Branch(_) => node.collect_leaves(out),
                }
            }
        }
    }
}

// Manual Deserialize so branch children keep document order. Deriving would
// need an ordered map type; a Vec of pairs filled from MapAccess does the
// same job without one.
impl<'de> Deserialize<'de> for CatalogNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = CatalogNode;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a table of catalog nodes")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CatalogNode::Leaf(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CatalogNode::Leaf(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(CatalogNode::Leaf(v))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((key, node)) = map.next_entry::<String, CatalogNode>()? {
                    entries.push((key, node));
                }
                Ok(CatalogNode::Branch(entries))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}
