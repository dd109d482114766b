use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use log::info;

use crossprod::{logging, Animator, App, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.animation_config() {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    logging::init(&cli.log_config).context("Could not configure logger")?;

    info!(
        "Animating |v| = {}, |w| = {} over {} frames",
        config.magnitudes[0], config.magnitudes[1], config.frames
    );

    let mut animator = Animator::new(config).context("Failed to create Animator")?;

    if let Some(path) = &cli.export {
        let (width, height) = cli.export_size;
        crossprod::plot::export_png(&animator.final_scene(), path, width, height)?;
    }

    if cli.headless {
        animator.run_headless();
        return Ok(());
    }

    let app = App::new(animator).context("Failed to create App")?;

    app.run()
}
