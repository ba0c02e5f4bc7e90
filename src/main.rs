use clap::Parser;
use hint_engine::cli::commands::{cmd_modes, cmd_run, cmd_scan};
use hint_engine::cli::config::{Cli, Commands, load_config, resolve_trace_path};
use hint_engine::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref());

    // Resolve assistant settings: CLI > config > defaults
    if let Some(endpoint) = &cli.assistant_endpoint {
        config.assistant.endpoint = Some(endpoint.clone());
    }
    if let Some(model) = &cli.assistant_model {
        config.assistant.model = Some(model.clone());
    }

    let trace_path = resolve_trace_path(&cli, &config).map(str::to_string);
    let tracer = match trace_path.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    if cli.verbose > 0 && tracer.is_enabled() {
        eprintln!("Tracing session events to {}", trace_path.as_deref().unwrap_or_default());
    }

    match &cli.command {
        Commands::Scan { page, mode } => {
            cmd_scan(page, mode, &config, tracer, cli.verbose)?;
        }
        Commands::Run {
            page,
            mode,
            keys,
            assistant,
        } => {
            cmd_run(page, mode, keys, assistant, &config, tracer, cli.verbose)?;
        }
        Commands::Modes => cmd_modes(),
    }

    Ok(())
}
