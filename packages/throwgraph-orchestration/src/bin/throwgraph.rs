//! Run driver
//!
//! Usage: `throwgraph <config.json>`. Exit code 0 on success, 1 for a fatal
//! configuration error or a strict-mode failure.

use std::path::Path;
use std::process::ExitCode;
use throwgraph_ir::AnalysisConfig;
use throwgraph_orchestration::AnalysisPipeline;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(config_path) = std::env::args().nth(1) else {
        eprintln!("usage: throwgraph <config.json>");
        return ExitCode::from(1);
    };
    let config = match AnalysisConfig::from_file(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("throwgraph: {e}");
            return ExitCode::from(1);
        }
    };

    match AnalysisPipeline::new(config).run() {
        Ok(run) => {
            print!("{}", run.report.render());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("throwgraph: {e}");
            ExitCode::from(1)
        }
    }
}
