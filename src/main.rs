use clap::Parser;
use sales_dash::args::{Args, Command};
use sales_dash::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // When SALES_DASH_IN_TEST_MODE is set and non-empty the records come from built-in sample data
    // instead of the sales data service.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.base_url()).await?.print(),

        Command::Render(render_args) => {
            let config = Config::load(home).await?;
            let filters = render_args.filters().filters()?;
            commands::render(&config, mode, &filters, render_args.format())
                .await?
                .print()
        }

        Command::Records(filter_args) => {
            let config = Config::load(home).await?;
            let filters = filter_args.filters()?;
            commands::records(&config, mode, &filters).await?.print()
        }

        Command::Sellers(sellers_args) => {
            let config = Config::load(home).await?;
            commands::sellers(&config, mode, sellers_args.query())
                .await?
                .print()
        }

        Command::Schema => commands::schema().await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => {
            // Without RUST_LOG, only this crate logs, at the requested level.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
