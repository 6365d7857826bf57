use std::io::Write;

use clap::Parser;
use tracker_app::{run, AppConfig, Cli};
use tracker_logging::{tracker_error, tracker_info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(&cli);

    tracker_logging::initialize(
        config.log.target.into(),
        config.log.level_filter(),
        &config.log.path,
    );
    tracker_info!("jobtrack {} starting: {:?}", env!("CARGO_PKG_VERSION"), cli.command);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = run(&cli.command, &config, &mut out);
    out.flush()?;
    if let Err(err) = &result {
        tracker_error!("Command failed: {:#}", err);
    }
    result
}
