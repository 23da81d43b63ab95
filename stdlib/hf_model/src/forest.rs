//! Random forest evaluation.
//!
//! Each tree is stored as a flat node list with the root at index 0, the
//! layout produced by exporting a fitted CART ensemble. A sample descends to
//! the left child when `x[feature] <= threshold`. Leaves hold per-class
//! weights (sample counts or fractions); a tree votes with its leaf weights
//! normalised to sum to one and the forest averages the votes.
//!
//! A [`RandomForest`] only exists validated: [`RandomForest::new`] and
//! deserialisation both run the structural checks, so scoring never indexes
//! outside a tree or follows a cycle.

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, ScoreError};
use crate::scorer::{check_row, Scorer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: [f64; 2],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Children must come after their parent, which also rules out cycles.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let n = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {i} splits on feature {feature}, model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= i || child >= n {
                            return Err(format!("node {i} points at invalid child {child}"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    let ok = value.iter().all(|w| w.is_finite() && *w >= 0.0);
                    if !ok || value[0] + value[1] <= 0.0 {
                        return Err(format!("leaf {i} has invalid class weights {value:?}"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Normalised class distribution of the leaf reached by `x`.
    fn leaf_distribution(&self, x: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
                Node::Leaf { value } => {
                    let total = value[0] + value[1];
                    return [value[0] / total, value[1] / total];
                }
            }
        }
    }
}

/// Serialised shape of a [`RandomForest`], checked on the way in.
#[derive(Deserialize)]
struct ForestDef {
    n_features: usize,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForestDef")]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<Tree>,
    #[serde(skip)]
    name: String,
}

impl TryFrom<ForestDef> for RandomForest {
    type Error = LoadError;

    fn try_from(def: ForestDef) -> Result<Self, LoadError> {
        RandomForest::new(String::new(), def.n_features, def.trees)
    }
}

impl RandomForest {
    /// Validate the structure and build a ready-to-score forest.
    pub fn new(
        name: impl Into<String>,
        n_features: usize,
        trees: Vec<Tree>,
    ) -> Result<Self, LoadError> {
        let forest = Self {
            n_features,
            trees,
            name: name.into(),
        };
        forest.validate()?;
        Ok(forest)
    }

    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.trees.is_empty() {
            return Err(LoadError::Invalid("random forest has no trees".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|msg| LoadError::Invalid(format!("tree {t}: {msg}")))?;
        }
        Ok(())
    }
}

impl Scorer for RandomForest {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ScoreError> {
        check_row(features, self.n_features)?;
        let mut acc = [0.0, 0.0];
        for tree in &self.trees {
            let [p0, p1] = tree.leaf_distribution(features);
            acc[0] += p0;
            acc[1] += p1;
        }
        let n = self.trees.len() as f64;
        Ok([acc[0] / n, acc[1] / n])
    }
}
