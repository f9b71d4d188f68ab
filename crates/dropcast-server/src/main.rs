use anyhow::Context;
use clap::Parser;
use dropcast_classifiers::{predict_detailed, ModelLoader};
use dropcast_core::FIELD_SPECS;
use dropcast_server::{
    read_input, run_server, telemetry, Cli, Commands, ConfigOverrides, PredictionResponse,
    ServerConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve {
            listen,
            port,
            model,
        } => {
            let overrides = ConfigOverrides {
                model_path: model,
                listen,
                port,
            };
            let config = ServerConfig::load(&cli.config, &overrides)?;
            info!("Configuration loaded from {}", cli.config.display());

            let loader = loader_for(config.model_path.clone())?;
            let model = loader.load_shared().context("model failed to load")?;

            let metrics = telemetry::init_metrics()?;
            run_server(config, model, Some(metrics)).await
        }

        Commands::Predict {
            input,
            set,
            model,
            json,
        } => {
            let config = ServerConfig::load(
                &cli.config,
                &ConfigOverrides {
                    model_path: model,
                    ..Default::default()
                },
            )?;
            let loader = loader_for(config.model_path)?;
            let model = loader.load_shared().context("model failed to load")?;

            let data = read_input(input.as_deref(), &set, std::io::stdin())
                .context("failed to read prediction input")?;

            let start = Instant::now();
            let prediction = predict_detailed(data, model.as_ref())?;
            let response = PredictionResponse::new(prediction, start.elapsed().as_micros() as u64);

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", response.render_text());
            }
            Ok(())
        }

        Commands::Schema => {
            print!("{}", serde_yaml::to_string(&FIELD_SPECS.to_vec())?);
            Ok(())
        }
    }
}

fn loader_for(path: Option<PathBuf>) -> anyhow::Result<ModelLoader> {
    Ok(match path {
        Some(path) => ModelLoader::new(path),
        None => ModelLoader::beside_executable()?,
    })
}
