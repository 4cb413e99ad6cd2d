use serde::{Deserialize, Serialize};

use super::{
    argmax_label, ensure_finite, InferenceError, InvalidModel, OutputKind, Predictor, RawOutput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeTask {
    Classification,
    Regression,
}

/// Flattened decision tree; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution for classification, `[value]` for regression.
    Leaf { value: Vec<f64> },
}

/// Averaging ensemble of decision trees (random forest style).
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    task: TreeTask,
    classes: Vec<String>,
    trees: Vec<Tree>,
    input_len: usize,
}

impl TreeEnsemble {
    pub fn new(
        task: TreeTask,
        classes: Vec<String>,
        trees: Vec<Tree>,
        input_len: usize,
    ) -> Result<Self, InvalidModel> {
        if trees.is_empty() {
            return Err(InvalidModel::NoTrees);
        }

        let leaf_width = match task {
            TreeTask::Classification if classes.len() < 2 => {
                return Err(InvalidModel::TooFewClasses {
                    model: "tree_ensemble",
                });
            }
            TreeTask::Classification => classes.len(),
            TreeTask::Regression => 1,
        };

        for (tree_idx, tree) in trees.iter().enumerate() {
            validate_tree(tree_idx, tree, leaf_width, input_len)?;
        }

        Ok(Self {
            task,
            classes,
            trees,
            input_len,
        })
    }

    fn leaf_for<'a>(
        &self,
        tree_idx: usize,
        tree: &'a Tree,
        features: &[f64],
    ) -> Result<&'a [f64], InferenceError> {
        let mut idx = 0;
        loop {
            match tree.nodes.get(idx) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Some(TreeNode::Leaf { value }) => return Ok(value),
                None => {
                    return Err(InferenceError::BrokenTree {
                        tree: tree_idx,
                        node: idx,
                    });
                }
            }
        }
    }
}

// Children must point strictly forward so every walk terminates.
fn validate_tree(
    tree_idx: usize,
    tree: &Tree,
    leaf_width: usize,
    input_len: usize,
) -> Result<(), InvalidModel> {
    if tree.nodes.is_empty() {
        return Err(InvalidModel::EmptyTree { tree: tree_idx });
    }

    for (node_idx, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= input_len {
                    return Err(InvalidModel::FeatureOutOfRange {
                        tree: tree_idx,
                        node: node_idx,
                        feature: *feature,
                        input_len,
                    });
                }
                if !threshold.is_finite() {
                    return Err(InvalidModel::NonFiniteThreshold {
                        tree: tree_idx,
                        node: node_idx,
                    });
                }
                for child in [left, right] {
                    if *child <= node_idx || *child >= tree.nodes.len() {
                        return Err(InvalidModel::InvalidChild {
                            tree: tree_idx,
                            node: node_idx,
                            child: *child,
                        });
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if value.len() != leaf_width {
                    return Err(InvalidModel::LeafWidth {
                        tree: tree_idx,
                        node: node_idx,
                        expected: leaf_width,
                        found: value.len(),
                    });
                }
            }
        }
    }

    Ok(())
}

impl Predictor for TreeEnsemble {
    fn name(&self) -> &'static str {
        "tree_ensemble"
    }

    fn output_kind(&self) -> OutputKind {
        match self.task {
            TreeTask::Classification => OutputKind::Classification,
            TreeTask::Regression => OutputKind::Regression,
        }
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn infer(&self, features: &[f64]) -> Result<RawOutput, InferenceError> {
        self.check_input(features)?;

        let width = match self.task {
            TreeTask::Classification => self.classes.len(),
            TreeTask::Regression => 1,
        };
        let mut sums = vec![0.0; width];

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            let leaf = self.leaf_for(tree_idx, tree, features)?;
            for (sum, v) in sums.iter_mut().zip(leaf) {
                *sum += v;
            }
        }

        let count = self.trees.len() as f64;
        let averaged: Vec<f64> = sums
            .into_iter()
            .map(|sum| ensure_finite(sum / count))
            .collect::<Result<_, _>>()?;

        Ok(match self.task {
            TreeTask::Classification => RawOutput::Classification {
                label: argmax_label(&self.classes, &averaged),
                probabilities: averaged,
            },
            TreeTask::Regression => RawOutput::Regression(averaged[0]),
        })
    }
}
