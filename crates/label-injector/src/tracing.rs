use anyhow::{anyhow, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

// Setup the tracing system. This MUST be done inside of a tokio Runtime
// because some collectors rely on it and would panic otherwise.
pub fn setup_tracing(log_level: &str, log_fmt: &str, log_no_color: bool) -> Result<()> {
    let filter_layer = EnvFilter::new(log_level)
        // the HTTP and TLS stacks emit their own trace events, we don't care about them
        .add_directive("h2=off".parse()?)
        .add_directive("hyper=off".parse()?)
        .add_directive("hyper_util=off".parse()?)
        .add_directive("rustls=off".parse()?)
        .add_directive("tower=off".parse()?);

    match log_fmt {
        "json" => tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().json())
            .try_init()?,
        "text" => {
            let fmt_layer = fmt::layer().with_ansi(!log_no_color);

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .try_init()?
        }
        _ => return Err(anyhow!("Unknown log message format")),
    };

    Ok(())
}
