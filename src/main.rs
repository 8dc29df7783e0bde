use clap::Parser;
use ng_locator_scan::cli::commands::{cmd_buttons, cmd_fields, cmd_verify, cmd_xpath};
use ng_locator_scan::cli::config::{Cli, Commands, load_config};
use ng_locator_scan::trace::logger::TraceLogger;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let tracer = match cli.trace.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    match cli.command {
        Commands::Fields(args) => {
            cmd_fields(&args, &config, &tracer)?;
        }
        Commands::Buttons(args) => {
            cmd_buttons(&args, &config, &tracer)?;
        }
        Commands::Xpath { source, expr, base } => {
            cmd_xpath(&source, &expr, base.as_deref())?;
        }
        Commands::Verify {
            source,
            descriptors,
            format,
            output,
        } => {
            let format = format.unwrap_or(config.output.report_format);
            let all_passed = cmd_verify(&source, &descriptors, format, output.as_deref(), &tracer)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise the level follows `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
