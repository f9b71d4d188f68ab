//! A single LightGBM regression tree and its split decisions

/// Values with magnitude at or below this are treated as zero for missing-value routing
const ZERO_THRESHOLD: f64 = 1e-35;

/// How a split routes missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingType {
    /// No special handling; NaN is read as 0.0
    None,
    /// Zero is the missing marker
    Zero,
    /// NaN is the missing marker
    NaN,
}

/// Decoded `decision_type` bit field of an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionType {
    pub categorical: bool,
    pub default_left: bool,
    pub missing: MissingType,
}

impl DecisionType {
    /// Decode the packed byte: bit 0 categorical, bit 1 default-left, bits 2-3 missing type
    pub fn from_bits(bits: u8) -> Option<Self> {
        let missing = match (bits >> 2) & 0b11 {
            0 => MissingType::None,
            1 => MissingType::Zero,
            2 => MissingType::NaN,
            _ => return None,
        };

        Some(Self {
            categorical: bits & 0b01 != 0,
            default_left: bits & 0b10 != 0,
            missing,
        })
    }
}

/// Internal split node. Child indices >= 0 address nodes, negative ones address leaf `!child`.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    pub feature: usize,
    pub threshold: f64,
    pub decision: DecisionType,
    pub left: i32,
    pub right: i32,
}

/// A regression tree whose leaf values already include shrinkage
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub(crate) nodes: Vec<SplitNode>,
    pub(crate) leaf_values: Vec<f64>,
    /// Offsets into `cat_threshold`, one more than the number of categorical splits
    pub(crate) cat_boundaries: Vec<usize>,
    /// Bitsets of categories routed left
    pub(crate) cat_threshold: Vec<u32>,
}

impl Tree {
    /// A tree with no splits
    pub fn constant(value: f64) -> Self {
        Self {
            nodes: Vec::new(),
            leaf_values: vec![value],
            cat_boundaries: Vec::new(),
            cat_threshold: Vec::new(),
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.leaf_values.len()
    }

    /// Highest feature index any split reads, if the tree has splits
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes.iter().map(|node| node.feature).max()
    }

    /// Output of the tree for one row
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.leaf_values[self.leaf_index(row)]
    }

    /// Walk from the root to a leaf.
    ///
    /// Callers guarantee `row` covers every split feature; the parser guarantees
    /// internal children always point further down the node list, so the walk ends.
    pub fn leaf_index(&self, row: &[f64]) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            let next = if node.decision.categorical {
                self.categorical_decision(node, row[node.feature])
            } else {
                numerical_decision(node, row[node.feature])
            };

            if next < 0 {
                return !next as usize;
            }
            idx = next as usize;
        }
    }

    fn categorical_decision(&self, node: &SplitNode, value: f64) -> i32 {
        let value = if value.is_nan() {
            if node.decision.missing == MissingType::NaN {
                return node.right;
            }
            0.0
        } else {
            value
        };

        if value < 0.0 {
            return node.right;
        }

        let cat_idx = node.threshold as usize;
        let start = self.cat_boundaries[cat_idx];
        let end = self.cat_boundaries[cat_idx + 1];
        if in_bitset(&self.cat_threshold[start..end], value as usize) {
            node.left
        } else {
            node.right
        }
    }
}

fn numerical_decision(node: &SplitNode, value: f64) -> i32 {
    let missing = node.decision.missing;
    let value = if value.is_nan() && missing != MissingType::NaN {
        0.0
    } else {
        value
    };

    let is_missing = match missing {
        MissingType::Zero => value.abs() <= ZERO_THRESHOLD,
        MissingType::NaN => value.is_nan(),
        MissingType::None => false,
    };

    if is_missing {
        return if node.decision.default_left {
            node.left
        } else {
            node.right
        };
    }

    if value <= node.threshold {
        node.left
    } else {
        node.right
    }
}

fn in_bitset(bits: &[u32], pos: usize) -> bool {
    let word = pos / 32;
    word < bits.len() && (bits[word] >> (pos % 32)) & 1 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numerical(feature: usize, threshold: f64, bits: u8, left: i32, right: i32) -> SplitNode {
        SplitNode {
            feature,
            threshold,
            decision: DecisionType::from_bits(bits).unwrap(),
            left,
            right,
        }
    }

    #[test]
    fn test_decision_type_bits() {
        let plain = DecisionType::from_bits(0).unwrap();
        assert!(!plain.categorical && !plain.default_left);
        assert_eq!(plain.missing, MissingType::None);

        let nan_left = DecisionType::from_bits(10).unwrap();
        assert!(!nan_left.categorical && nan_left.default_left);
        assert_eq!(nan_left.missing, MissingType::NaN);

        let cat = DecisionType::from_bits(9).unwrap();
        assert!(cat.categorical);
        assert_eq!(cat.missing, MissingType::NaN);

        assert!(DecisionType::from_bits(12).is_none());
    }

    #[test]
    fn test_constant_tree() {
        let tree = Tree::constant(0.25);
        assert_eq!(tree.predict(&[]), 0.25);
        assert_eq!(tree.max_feature(), None);
    }

    #[test]
    fn test_numerical_split_with_nested_node() {
        // x0 <= 1.5 -> leaf 0, else (x1 <= 0.5 -> leaf 1, else leaf 2)
        let tree = Tree {
            nodes: vec![numerical(0, 1.5, 2, -1, 1), numerical(1, 0.5, 2, -2, -3)],
            leaf_values: vec![-1.0, 0.5, 2.0],
            cat_boundaries: Vec::new(),
            cat_threshold: Vec::new(),
        };

        assert_eq!(tree.predict(&[1.5, 9.0]), -1.0);
        assert_eq!(tree.predict(&[2.0, 0.0]), 0.5);
        assert_eq!(tree.predict(&[2.0, 1.0]), 2.0);
        assert_eq!(tree.max_feature(), Some(1));
    }

    #[test]
    fn test_nan_routing() {
        // missing type NaN, default right
        let nan_right = Tree {
            nodes: vec![numerical(0, 1.0, 8, -1, -2)],
            leaf_values: vec![10.0, 20.0],
            cat_boundaries: Vec::new(),
            cat_threshold: Vec::new(),
        };
        assert_eq!(nan_right.predict(&[f64::NAN]), 20.0);

        // missing type None: NaN reads as zero
        let no_missing = Tree {
            nodes: vec![numerical(0, 1.0, 0, -1, -2)],
            ..nan_right.clone()
        };
        assert_eq!(no_missing.predict(&[f64::NAN]), 10.0);

        // missing type Zero, default right: zero goes right even though 0 <= 1
        let zero_right = Tree {
            nodes: vec![numerical(0, 1.0, 4, -1, -2)],
            ..nan_right
        };
        assert_eq!(zero_right.predict(&[0.0]), 20.0);
        assert_eq!(zero_right.predict(&[0.5]), 10.0);
    }

    #[test]
    fn test_categorical_split() {
        // categories 2 and 33 go left
        let tree = Tree {
            nodes: vec![SplitNode {
                feature: 0,
                threshold: 0.0,
                decision: DecisionType::from_bits(9).unwrap(),
                left: -1,
                right: -2,
            }],
            leaf_values: vec![1.0, 0.0],
            cat_boundaries: vec![0, 2],
            cat_threshold: vec![1 << 2, 1 << 1],
        };

        assert_eq!(tree.predict(&[2.0]), 1.0);
        assert_eq!(tree.predict(&[33.0]), 1.0);
        assert_eq!(tree.predict(&[1.0]), 0.0);
        assert_eq!(tree.predict(&[64.0]), 0.0);
        assert_eq!(tree.predict(&[-2.0]), 0.0);
        assert_eq!(tree.predict(&[f64::NAN]), 0.0);
    }
}
