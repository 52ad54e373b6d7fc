#![warn(clippy::all)]

#[macro_use]
extern crate log;

use anyhow::Result;
use dotenv::dotenv;
use speech_fixtures::{config::Config, pipeline::local};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_config()?;
    let report = local::run(&config)?;

    info!("Fixture written: {}", report);
    Ok(())
}
