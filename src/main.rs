use pgan_config::{RunConfig, logging};
use tracing::{error, info};

fn main() {
    logging::init();

    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error building run config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Invalid run config: {}", e);
        std::process::exit(1);
    }

    info!("{}", config);

    match config.save_to_run_dir() {
        Ok(path) => info!("Run config written to '{}'", path.display()),
        Err(e) => {
            error!("Error writing run config: {}", e);
            std::process::exit(1);
        }
    }
}
