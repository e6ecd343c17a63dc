use std::process::ExitCode;

use selene_engine::device::GpuInit;
use selene_engine::logging::{init_logging, LoggingConfig};
use selene_engine::window::{LogicalSize, Runtime, RuntimeConfig};
use selene_viewer::{MoonApp, ViewerConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::default();
    let (width, height) = config.initial_size;
    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(width, height),
    };

    match Runtime::run(runtime, GpuInit::default(), MoonApp::new(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("selene runtime error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
