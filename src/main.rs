use std::process::ExitCode;

use dossier::{configuration::get_configuration, startup::Pipeline};
use env_logger::Env;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            log::error!("Failed to load .env file: {}", e);
        }
    }

    let configuration = match get_configuration() {
        Ok(configuration) => configuration,
        Err(e) => {
            log::error!("Failed to read configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::build(configuration) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("Failed to set up pipeline: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    pipeline.run().await;

    ExitCode::SUCCESS
}
