use anyhow::{anyhow, Result};

use label_injector::{cli, config::Config, tracing::setup_tracing, LabelInjector};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color)?;

    // Starting from rustls 0.22, each application must set its default crypto provider.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Cannot install the default crypto provider"))?;

    let label_injector = LabelInjector::new_from_config(config).await?;
    label_injector.run().await
}
