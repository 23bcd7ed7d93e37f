use clap::Parser;
use condtree::cli::args::Cli;
use condtree::cli::commands::execute_command;
use condtree::cli::output;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` picks the level for condtree's own targets; `RUST_LOG` replaces it entirely.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("warn,condtree={level}")));

    // Stdout carries JSON documents, so diagnostics stay on stderr
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_span_events(if verbosity > 2 { FmtSpan::CLOSE } else { FmtSpan::NONE })
        .with_filter(filter);

    tracing_subscriber::registry().with(layer).init();
    tracing::debug!(verbosity, "tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use condtree::util::testing;

    #[test]
    fn verify_cli() {
        testing::init_test_setup();
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_debug_flag_then_counts_verbosity() {
        let cli = Cli::try_parse_from(["condtree", "-dd", "fields"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}
