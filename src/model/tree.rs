//! Gradient boosted tree ensemble (XGBoost `gbtree` dumps)

use super::artifact::TreeNode;
use super::Regressor;
use crate::error::ModelFault;
use crate::types::{FeatureVector, FEATURE_COUNT};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        // XGBoost stores and compares thresholds in single precision
        threshold: f32,
        yes: usize,
        no: usize,
    },
    Leaf(f64),
}

/// Flattened tree, root at index 0
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn compile(root: &TreeNode) -> Result<Self, String> {
        let mut dump_nodes = Vec::new();
        flatten(root, &mut dump_nodes);

        let mut index = HashMap::with_capacity(dump_nodes.len());
        for (pos, node) in dump_nodes.iter().enumerate() {
            if index.insert(node.nodeid, pos).is_some() {
                return Err(format!("duplicate node id {}", node.nodeid));
            }
        }
        let resolve = |id: Option<u32>, nodeid: u32, edge: &str| -> Result<usize, String> {
            let id = id.ok_or_else(|| format!("node {} has no '{}' branch", nodeid, edge))?;
            index
                .get(&id)
                .copied()
                .ok_or_else(|| format!("node {} points to unknown node {}", nodeid, id))
        };

        let mut nodes = Vec::with_capacity(dump_nodes.len());
        for node in &dump_nodes {
            if let Some(value) = node.leaf {
                if !value.is_finite() {
                    return Err(format!("leaf {} is not finite", node.nodeid));
                }
                nodes.push(Node::Leaf(value));
                continue;
            }

            let name = node
                .split
                .as_deref()
                .ok_or_else(|| format!("node {} is neither a split nor a leaf", node.nodeid))?;
            let feature = resolve_feature(name)
                .ok_or_else(|| format!("node {} splits on unknown feature '{}'", node.nodeid, name))?;
            let threshold = node
                .split_condition
                .ok_or_else(|| format!("node {} has no split condition", node.nodeid))?;

            nodes.push(Node::Split {
                feature,
                threshold: threshold as f32,
                yes: resolve(node.yes, node.nodeid, "yes")?,
                no: resolve(node.no, node.nodeid, "no")?,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, x: &[f64; FEATURE_COUNT]) -> Option<f64> {
        let mut pos = 0;
        // a well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.nodes.len() {
            match self.nodes[pos] {
                Node::Leaf(value) => return Some(value),
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                } => {
                    pos = if (x[feature] as f32) < threshold { yes } else { no };
                }
            }
        }
        None
    }
}

fn flatten<'a>(node: &'a TreeNode, out: &mut Vec<&'a TreeNode>) {
    out.push(node);
    for child in &node.children {
        flatten(child, out);
    }
}

/// Map a dump split name onto a canonical feature position.
/// Accepts the feature name itself or XGBoost's positional `fN`.
fn resolve_feature(name: &str) -> Option<usize> {
    FeatureVector::feature_index(name).or_else(|| {
        name.strip_prefix('f')
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n < FEATURE_COUNT)
    })
}

/// `base_score + Σ leaf(tree)`
#[derive(Debug, Clone)]
pub struct TreeEnsembleRegressor {
    base_score: f64,
    trees: Vec<Tree>,
}

impl TreeEnsembleRegressor {
    pub fn from_dump(base_score: f64, trees: &[TreeNode]) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        if !base_score.is_finite() {
            return Err("base_score is not finite".to_string());
        }
        let trees = trees
            .iter()
            .enumerate()
            .map(|(i, t)| Tree::compile(t).map_err(|e| format!("tree {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { base_score, trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for TreeEnsembleRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelFault> {
        let x = features.values();
        let mut y = self.base_score;
        for (i, tree) in self.trees.iter().enumerate() {
            y += tree
                .leaf_value(&x)
                .ok_or(ModelFault::UnterminatedTree { tree: i })?;
        }
        if !y.is_finite() {
            return Err(ModelFault::NonFinite(y));
        }
        Ok(y)
    }

    fn name(&self) -> &str {
        "XGBoost"
    }
}
