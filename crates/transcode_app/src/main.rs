mod platform;

use clap::Parser;
use session_logging::session_info;

fn main() -> anyhow::Result<()> {
    let cli = platform::Cli::parse();
    let settings = platform::Settings::load(&cli)?;

    session_logging::initialize(
        settings.log.into(),
        settings.level_filter()?,
        &settings.log_file,
    );
    session_info!("Starting transcode console against {}", settings.server);

    platform::run_app(&settings)
}
