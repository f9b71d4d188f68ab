//! Parser for LightGBM's text model format (`Booster.save_model`)

use std::collections::HashMap;
use std::str::FromStr;

use super::tree::{DecisionType, SplitNode, Tree};
use super::Objective;

/// Model format versions this parser understands
pub const SUPPORTED_VERSIONS: [&str; 3] = ["v2", "v3", "v4"];

const END_OF_TREES: &str = "end of trees";

/// Problems found while reading a model file
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("not a LightGBM text model")]
    NotAModel,

    #[error("unsupported model version '{0}'")]
    UnsupportedVersion(String),

    #[error("missing key '{key}' in {section}")]
    MissingKey { section: String, key: String },

    #[error("invalid value for '{key}' in {section}: {value}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("unsupported model: {0}")]
    Unsupported(String),

    #[error("malformed model: {0}")]
    Malformed(String),
}

/// Everything read from a model file, before it is assembled into a model
#[derive(Debug, Clone)]
pub struct ParsedModel {
    pub version: String,
    pub num_class: usize,
    pub num_tree_per_iteration: usize,
    pub objective: Objective,
    pub feature_names: Vec<String>,
    pub average_output: bool,
    pub trees: Vec<Tree>,
}

/// `key=value` lines of one section; bare flags such as `average_output` map to ""
struct Section<'a> {
    name: String,
    entries: HashMap<&'a str, &'a str>,
}

impl<'a> Section<'a> {
    fn new(name: impl Into<String>, lines: &[&'a str]) -> Self {
        let entries = lines
            .iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.split_once('=').unwrap_or((*line, "")))
            .map(|(key, value)| (key.trim(), value.trim()))
            .collect();
        Self {
            name: name.into(),
            entries,
        }
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn raw(&self, key: &str) -> Result<&'a str, ParseError> {
        self.entries
            .get(key)
            .copied()
            .ok_or_else(|| ParseError::MissingKey {
                section: self.name.clone(),
                key: key.to_string(),
            })
    }

    fn invalid(&self, key: &str, value: &str) -> ParseError {
        ParseError::InvalidValue {
            section: self.name.clone(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn scalar<T: FromStr>(&self, key: &str) -> Result<T, ParseError> {
        let raw = self.raw(key)?;
        raw.parse().map_err(|_| self.invalid(key, raw))
    }

    fn list<T: FromStr>(&self, key: &str) -> Result<Vec<T>, ParseError> {
        let raw = self.raw(key)?;
        raw.split_whitespace()
            .map(|item| item.parse().map_err(|_| self.invalid(key, item)))
            .collect()
    }

    /// A list that must have exactly `len` entries
    fn list_of<T: FromStr>(&self, key: &str, len: usize) -> Result<Vec<T>, ParseError> {
        let values = self.list(key)?;
        if values.len() != len {
            return Err(ParseError::Malformed(format!(
                "{}: '{}' has {} entries, expected {}",
                self.name,
                key,
                values.len(),
                len
            )));
        }
        Ok(values)
    }
}

/// Parse the full text of a model file
pub fn parse_model(text: &str) -> Result<ParsedModel, ParseError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    if lines.iter().find(|line| !line.is_empty()) != Some(&"tree") {
        return Err(ParseError::NotAModel);
    }

    let end = lines
        .iter()
        .position(|line| *line == END_OF_TREES)
        .ok_or_else(|| ParseError::Malformed(format!("no '{}' marker", END_OF_TREES)))?;
    let lines = &lines[..end];

    let first_tree = lines
        .iter()
        .position(|line| line.starts_with("Tree="))
        .unwrap_or(lines.len());

    let header = Section::new("header", &lines[..first_tree]);

    let version: String = header.scalar("version")?;
    if !SUPPORTED_VERSIONS.contains(&version.as_str()) {
        return Err(ParseError::UnsupportedVersion(version));
    }

    let num_class: usize = header.scalar("num_class")?;
    let num_tree_per_iteration: usize = header.scalar("num_tree_per_iteration")?;
    let max_feature_idx: usize = header.scalar("max_feature_idx")?;
    let objective = parse_objective(&header)?;
    let feature_names: Vec<String> = header.list("feature_names")?;
    let average_output = header.has("average_output");

    if num_class == 0 || num_tree_per_iteration == 0 {
        return Err(ParseError::Malformed(
            "num_class and num_tree_per_iteration must be positive".to_string(),
        ));
    }
    if feature_names.len() != max_feature_idx + 1 {
        return Err(ParseError::Malformed(format!(
            "{} feature names but max_feature_idx is {}",
            feature_names.len(),
            max_feature_idx
        )));
    }
    match objective {
        Objective::Binary { .. } if num_class != 1 => {
            return Err(ParseError::Malformed(format!(
                "binary objective with num_class={}",
                num_class
            )))
        }
        Objective::Multiclass | Objective::MulticlassOva { .. }
            if num_class != num_tree_per_iteration =>
        {
            return Err(ParseError::Malformed(format!(
                "num_class={} but num_tree_per_iteration={}",
                num_class, num_tree_per_iteration
            )))
        }
        _ => {}
    }

    let mut trees = Vec::new();
    let mut start = first_tree;
    while start < lines.len() {
        let next = lines[start + 1..]
            .iter()
            .position(|line| line.starts_with("Tree="))
            .map(|offset| start + 1 + offset)
            .unwrap_or(lines.len());

        let name = lines[start].replace('=', " ");
        let tree = parse_tree(&Section::new(name, &lines[start + 1..next]))?;
        if let Some(feature) = tree.max_feature() {
            if feature > max_feature_idx {
                return Err(ParseError::Malformed(format!(
                    "tree {} splits on feature {} beyond max_feature_idx {}",
                    trees.len(),
                    feature,
                    max_feature_idx
                )));
            }
        }
        trees.push(tree);
        start = next;
    }

    if trees.is_empty() {
        return Err(ParseError::Malformed("model has no trees".to_string()));
    }
    if trees.len() % num_tree_per_iteration != 0 {
        return Err(ParseError::Malformed(format!(
            "{} trees is not a multiple of {} trees per iteration",
            trees.len(),
            num_tree_per_iteration
        )));
    }

    Ok(ParsedModel {
        version,
        num_class,
        num_tree_per_iteration,
        objective,
        feature_names,
        average_output,
        trees,
    })
}

/// `objective=<name> [key:value ...]`
fn parse_objective(header: &Section<'_>) -> Result<Objective, ParseError> {
    let raw = header.raw("objective")?;
    let mut tokens = raw.split_whitespace();
    let name = tokens.next().ok_or_else(|| header.invalid("objective", raw))?;

    let params: HashMap<&str, &str> = tokens.filter_map(|token| token.split_once(':')).collect();
    let sigmoid = match params.get("sigmoid") {
        Some(value) => value
            .parse::<f64>()
            .map_err(|_| header.invalid("objective", raw))?,
        None => 1.0,
    };

    match name {
        "binary" => Ok(Objective::Binary { sigmoid }),
        "multiclass" | "softmax" => Ok(Objective::Multiclass),
        "multiclassova" | "multiclass_ova" | "ova" | "ovr" => {
            Ok(Objective::MulticlassOva { sigmoid })
        }
        other => Err(ParseError::Unsupported(format!(
            "objective '{}' is not a classification objective",
            other
        ))),
    }
}

fn parse_tree(section: &Section<'_>) -> Result<Tree, ParseError> {
    let num_leaves: usize = section.scalar("num_leaves")?;
    if num_leaves == 0 {
        return Err(section.invalid("num_leaves", "0"));
    }
    let is_linear: u8 = if section.has("is_linear") {
        section.scalar("is_linear")?
    } else {
        0
    };
    if is_linear != 0 {
        return Err(ParseError::Unsupported(format!(
            "{} is a linear tree",
            section.name
        )));
    }

    let leaf_values: Vec<f64> = section.list_of("leaf_value", num_leaves)?;
    if num_leaves == 1 {
        return Ok(Tree::constant(leaf_values[0]));
    }

    let num_nodes = num_leaves - 1;
    let features: Vec<usize> = section.list_of("split_feature", num_nodes)?;
    let thresholds: Vec<f64> = section.list_of("threshold", num_nodes)?;
    let decisions: Vec<u8> = section.list_of("decision_type", num_nodes)?;
    let lefts: Vec<i32> = section.list_of("left_child", num_nodes)?;
    let rights: Vec<i32> = section.list_of("right_child", num_nodes)?;

    let num_cat: usize = if section.has("num_cat") {
        section.scalar("num_cat")?
    } else {
        0
    };
    let (cat_boundaries, cat_threshold) = if num_cat > 0 {
        let boundaries: Vec<usize> = section.list_of("cat_boundaries", num_cat + 1)?;
        let bits: Vec<u32> = section.list("cat_threshold")?;
        let ordered = boundaries[0] == 0 && boundaries.windows(2).all(|w| w[0] <= w[1]);
        if !ordered || boundaries[num_cat] != bits.len() {
            return Err(ParseError::Malformed(format!(
                "{}: cat_boundaries do not cover cat_threshold",
                section.name
            )));
        }
        (boundaries, bits)
    } else {
        (Vec::new(), Vec::new())
    };

    let mut nodes = Vec::with_capacity(num_nodes);
    for idx in 0..num_nodes {
        let decision = DecisionType::from_bits(decisions[idx])
            .ok_or_else(|| section.invalid("decision_type", &decisions[idx].to_string()))?;

        if decision.categorical {
            let threshold = thresholds[idx];
            if threshold < 0.0 || threshold.fract() != 0.0 || threshold as usize >= num_cat {
                return Err(ParseError::Malformed(format!(
                    "{}: node {} references categorical split {} of {}",
                    section.name, idx, threshold, num_cat
                )));
            }
        }

        for child in [lefts[idx], rights[idx]] {
            let valid = if child < 0 {
                (!child as usize) < num_leaves
            } else {
                (child as usize) > idx && (child as usize) < num_nodes
            };
            if !valid {
                return Err(ParseError::Malformed(format!(
                    "{}: node {} has invalid child {}",
                    section.name, idx, child
                )));
            }
        }

        nodes.push(SplitNode {
            feature: features[idx],
            threshold: thresholds[idx],
            decision,
            left: lefts[idx],
            right: rights[idx],
        });
    }

    Ok(Tree {
        nodes,
        leaf_values,
        cat_boundaries,
        cat_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CLASS_HEADER: &str = "tree
version=v4
num_class=1
num_tree_per_iteration=1
label_index=0
max_feature_idx=1
objective=binary sigmoid:1
feature_names=a b
feature_infos=[0:1] [0:1]
tree_sizes=100
";

    fn with_trees(header: &str, trees: &str) -> String {
        format!("{}\n{}\nend of trees\n\nparameters:\n[boosting: gbdt]\nend of parameters\n", header, trees)
    }

    #[test]
    fn test_parse_binary_model() {
        let text = with_trees(
            TWO_CLASS_HEADER,
            "Tree=0
num_leaves=2
num_cat=0
split_feature=1
split_gain=3.5
threshold=0.5
decision_type=2
left_child=-1
right_child=-2
leaf_value=-0.4 0.6
leaf_weight=1 1
leaf_count=10 10
internal_value=0
internal_weight=0
internal_count=20
is_linear=0
shrinkage=1
",
        );

        let parsed = parse_model(&text).unwrap();
        assert_eq!(parsed.version, "v4");
        assert_eq!(parsed.objective, Objective::Binary { sigmoid: 1.0 });
        assert_eq!(parsed.feature_names, vec!["a", "b"]);
        assert_eq!(parsed.trees.len(), 1);
        assert_eq!(parsed.trees[0].predict(&[0.0, 1.0]), 0.6);
        assert!(!parsed.average_output);
    }

    #[test]
    fn test_single_leaf_tree() {
        let text = with_trees(TWO_CLASS_HEADER, "Tree=0\nnum_leaves=1\nnum_cat=0\nleaf_value=0.125\nshrinkage=1\n");
        let parsed = parse_model(&text).unwrap();
        assert_eq!(parsed.trees[0].predict(&[5.0, 5.0]), 0.125);
    }

    #[test]
    fn test_rejects_non_model() {
        assert_eq!(parse_model("hello").unwrap_err(), ParseError::NotAModel);
        assert_eq!(parse_model("").unwrap_err(), ParseError::NotAModel);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let text = with_trees(
            &TWO_CLASS_HEADER.replace("version=v4", "version=v9"),
            "Tree=0\nnum_leaves=1\nleaf_value=0\n",
        );
        assert_eq!(
            parse_model(&text).unwrap_err(),
            ParseError::UnsupportedVersion("v9".to_string())
        );
    }

    #[test]
    fn test_rejects_regression_objective() {
        let text = with_trees(
            &TWO_CLASS_HEADER.replace("objective=binary sigmoid:1", "objective=regression"),
            "Tree=0\nnum_leaves=1\nleaf_value=0\n",
        );
        assert!(matches!(parse_model(&text), Err(ParseError::Unsupported(_))));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let text = format!("{}\nTree=0\nnum_leaves=1\nleaf_value=0\n", TWO_CLASS_HEADER);
        assert!(matches!(parse_model(&text), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_rejects_backward_child() {
        let text = with_trees(
            TWO_CLASS_HEADER,
            "Tree=0
num_leaves=3
split_feature=0 1
threshold=0.5 0.5
decision_type=2 2
left_child=1 -2
right_child=-1 0
leaf_value=1 2 3
",
        );
        assert!(matches!(parse_model(&text), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_rejects_feature_out_of_range() {
        let text = with_trees(
            TWO_CLASS_HEADER,
            "Tree=0
num_leaves=2
split_feature=7
threshold=0.5
decision_type=2
left_child=-1
right_child=-2
leaf_value=1 2
",
        );
        assert!(matches!(parse_model(&text), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_rejects_short_leaf_values() {
        let text = with_trees(
            TWO_CLASS_HEADER,
            "Tree=0
num_leaves=2
split_feature=0
threshold=0.5
decision_type=2
left_child=-1
right_child=-2
leaf_value=1
",
        );
        assert!(matches!(parse_model(&text), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_rejects_garbage_numbers() {
        let text = with_trees(TWO_CLASS_HEADER, "Tree=0\nnum_leaves=1\nleaf_value=abc\n");
        assert!(matches!(
            parse_model(&text),
            Err(ParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_linear_tree_flag() {
        let linear = with_trees(TWO_CLASS_HEADER, "Tree=0\nnum_leaves=1\nleaf_value=0\nis_linear=1\n");
        assert!(matches!(parse_model(&linear), Err(ParseError::Unsupported(_))));

        let garbled = with_trees(TWO_CLASS_HEADER, "Tree=0\nnum_leaves=1\nleaf_value=0\nis_linear=yes\n");
        assert!(matches!(
            parse_model(&garbled),
            Err(ParseError::InvalidValue { ref key, .. }) if key == "is_linear"
        ));
    }

    #[test]
    fn test_missing_feature_names() {
        let header: String = TWO_CLASS_HEADER
            .lines()
            .filter(|line| !line.starts_with("feature_names"))
            .map(|line| format!("{}\n", line))
            .collect();
        let text = with_trees(&header, "Tree=0\nnum_leaves=1\nleaf_value=0\n");
        assert_eq!(
            parse_model(&text).unwrap_err(),
            ParseError::MissingKey {
                section: "header".to_string(),
                key: "feature_names".to_string()
            }
        );
    }
}
