use std::path::Path;

use anyhow::Context;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};

const PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

/// Console-only configuration used when no config file is around.
pub fn default_config() -> anyhow::Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .context("building default log config")
}

/// Installs the logger from `path`, falling back to [`default_config`].
pub fn init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        log4rs::init_file(path, Default::default())
            .with_context(|| format!("reading {}", path.display()))?;
    } else {
        log4rs::init_config(default_config()?)?;
        log::debug!("{} not found, logging to console", path.display());
    }

    #[cfg(feature = "tracy")]
    {
        use tracing_subscriber::layer::SubscriberExt;

        tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(tracing_tracy::TracyLayer::new()),
        )
        .context("installing tracy subscriber")?;
    }

    Ok(())
}
