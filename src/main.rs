use std::process::ExitCode;

use trace_mining::{ConfigurationManager, TracePipeline, TraceReader, TrajectoryError};

fn run(args: &[String]) -> Result<(), TrajectoryError> {
    let manager = match args.get(2) {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    let config = manager.get_config().clone();

    let trace = TraceReader::new(config.reader.clone()).read_file(&args[1])?;
    let report = TracePipeline::new(config).run(&trace)?;

    let json = serde_json::to_string_pretty(&report).map_err(|e| TrajectoryError::Io {
        message: format!("Failed to serialize report: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!(
            "Usage: {} <trace_file> [config_json]",
            args.first().map_or("trace-mining", |s| s.as_str())
        );
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
