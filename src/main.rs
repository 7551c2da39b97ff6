use aether::core::config::Config;
use aether::shell::{install_interrupt_hint, Shell};
use log::info;

fn main() -> Result<(), aether::error::ShellError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::new();
    info!("using data directory {}", config.paths.data_dir.display());

    install_interrupt_hint()?;
    let mut shell = Shell::new(config)?;
    shell.run()
}
