use clap::{Parser, Subcommand};
use dropcast_core::{Error, FeatureRecord, ModelInput};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dropcast")]
#[command(
    author,
    version,
    about = "Predict student dropout and academic success"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "dropcast.yaml", env = "DROPCAST_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the prediction API server
    Serve {
        /// Listen address
        #[arg(short = 'l', long, env = "DROPCAST_LISTEN")]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long, env = "DROPCAST_PORT")]
        port: Option<u16>,

        /// Model artifact path (defaults to model_lgb.txt beside the executable)
        #[arg(short, long, env = "DROPCAST_MODEL")]
        model: Option<PathBuf>,
    },

    /// Predict the outcome of a single record
    Predict {
        /// JSON record file, or '-' for stdin. Without it the form defaults are used.
        #[arg(short, long)]
        input: Option<String>,

        /// Override a field, e.g. --set Debtor=1 (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, f64)>,

        /// Model artifact path (defaults to model_lgb.txt beside the executable)
        #[arg(short, long, env = "DROPCAST_MODEL")]
        model: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the input field catalogue as YAML
    Schema,
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((name.trim().to_string(), value))
}

/// Build the model input for `dropcast predict`.
///
/// `input` is a JSON file path, `-` for `stdin`, or `None` for the form
/// defaults. `set` overrides apply to the default record or to a JSON object;
/// other JSON shapes cannot take overrides.
pub fn read_input(
    input: Option<&str>,
    set: &[(String, f64)],
    mut stdin: impl Read,
) -> dropcast_core::Result<ModelInput> {
    let Some(source) = input else {
        let mut record = FeatureRecord::default();
        for (name, value) in set {
            if !record.set(name, *value) {
                return Err(Error::unsupported_input(format!("unknown field '{}'", name)));
            }
        }
        return Ok(ModelInput::from(&record));
    };

    let text = if source == "-" {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };

    let mut value: Value = serde_json::from_str(&text)?;

    if !set.is_empty() {
        let Some(object) = value.as_object_mut() else {
            return Err(Error::unsupported_input(
                "--set requires a JSON object input",
            ));
        };
        for (name, number) in set {
            object.insert(name.clone(), Value::from(*number));
        }
    }

    ModelInput::try_from(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Debtor=1").unwrap(),
            ("Debtor".to_string(), 1.0)
        );
        assert_eq!(
            parse_assignment(" GDP = 1.74 ").unwrap(),
            ("GDP".to_string(), 1.74)
        );
        assert!(parse_assignment("Debtor").is_err());
        assert!(parse_assignment("Debtor=yes").is_err());
    }

    #[test]
    fn test_parse_predict_command() {
        let cli = Cli::try_parse_from([
            "dropcast",
            "predict",
            "--set",
            "Debtor=1",
            "--set",
            "Tuition_fees_up_to_date=0",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Predict { input, set, json, .. } => {
                assert!(input.is_none());
                assert_eq!(set.len(), 2);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    fn overrides(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(name, value)| (name.to_string(), *value)).collect()
    }

    #[test]
    fn test_read_input_defaults_with_overrides() {
        let input = read_input(None, &overrides(&[("Debtor", 1.0)]), std::io::empty()).unwrap();

        let expected = FeatureRecord {
            debtor: 1.0,
            ..FeatureRecord::default()
        };
        assert_eq!(input, ModelInput::from(&expected));
    }

    #[test]
    fn test_read_input_rejects_unknown_override() {
        let err = read_input(None, &overrides(&[("Shoe_size", 42.0)]), std::io::empty())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(_)));
        assert!(err.to_string().contains("Shoe_size"));
    }

    #[test]
    fn test_read_input_from_file_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("student.json");
        std::fs::write(&path, r#"{"Debtor": 0, "GDP": 1.74}"#).unwrap();

        let input = read_input(
            path.to_str(),
            &overrides(&[("Debtor", 1.0)]),
            std::io::empty(),
        )
        .unwrap();

        match input {
            ModelInput::Mapping(mapping) => {
                assert_eq!(mapping.len(), 2);
                assert_eq!(mapping["Debtor"], 1.0);
                assert_eq!(mapping["GDP"], 1.74);
            }
            other => panic!("expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_read_input_from_stdin() {
        let input = read_input(Some("-"), &[], "[1, 2, 3]".as_bytes()).unwrap();
        assert_eq!(input, ModelInput::Sequence(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_read_input_array_rejects_overrides() {
        let err = read_input(Some("-"), &overrides(&[("Debtor", 1.0)]), "[1, 2]".as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput(_)));
    }

    #[test]
    fn test_read_input_errors() {
        let missing = read_input(Some("/nonexistent/dropcast/student.json"), &[], std::io::empty())
            .unwrap_err();
        assert!(matches!(missing, Error::Io(_)));

        let garbled = read_input(Some("-"), &[], "{not json".as_bytes()).unwrap_err();
        assert!(matches!(garbled, Error::Serialization(_)));
        assert_eq!(garbled.kind(), "serialization");
    }

    #[test]
    fn test_parse_serve_command() {
        let cli = Cli::try_parse_from(["dropcast", "serve", "-P", "9000", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), .. }));
    }
}
