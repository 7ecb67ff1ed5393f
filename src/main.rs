use clap::Parser;
use field_detection::cli::commands::{FillArgs, cmd_discover, cmd_fill, cmd_leak, cmd_mask};
use field_detection::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Fill {
            page,
            value,
            max_retries,
            retry_delay_ms,
            no_frames,
            wait_for_visible,
            format,
            trace,
            mask,
        } => {
            let args = FillArgs {
                page,
                value,
                max_retries,
                retry_delay_ms,
                no_frames,
                wait_for_visible,
                format,
                trace,
                mask,
            };
            let filled = cmd_fill(&args, &config).await?;
            if !filled {
                std::process::exit(1);
            }
        }
        Commands::Discover {
            page,
            no_frames,
            format,
        } => {
            cmd_discover(&page, no_frames, &format)?;
        }
        Commands::Leak { website, inbox } => {
            cmd_leak(&website, &inbox)?;
        }
        Commands::Mask { input, domain } => {
            // CLI > config > default
            let domain = domain.unwrap_or_else(|| config.masking.domain.clone());
            cmd_mask(input.as_deref(), &domain)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from `warn`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
