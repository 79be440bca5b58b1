use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mazemory::{app::App, config::GameConfig};

const USAGE: &str = "Usage: mazemory [--seed N] [CONFIG_PATH]";

/// Command line arguments: an optional seed override and an optional config path.
#[derive(Debug, Default, PartialEq)]
struct Args {
    seed: Option<u64>,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|e| format!("invalid seed {:?}: {}", value, e))?;
                parsed.seed = Some(seed);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if parsed.config.is_none() && !arg.starts_with('-') => {
                parsed.config = Some(PathBuf::from(arg));
            }
            _ => return Err(format!("unexpected argument {:?}\n{}", arg, USAGE)),
        }
    }
    Ok(parsed)
}

fn main() -> std::io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    let mut config = match GameConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // The terminal belongs to the game, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "mazemory.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    tracing::info!("[main] Loaded config: {:?}", config);

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(config).run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("[main] Game exited with error: {}", e);
    }
    result
}
