//! Phoenix swap terminal binary.

use swap_terminal::app::{App, Services};
use swap_terminal::debug;
use swap_terminal::ui::TerminalApp;
use tracing::{error, info};

const WINDOW_TITLE: &str = "Phoenix Swap Terminal";

fn main() {
    // Keep the guard alive so file logs are flushed on exit
    let _guard = debug::init();

    if let Err(e) = lib_core::config::init_config() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("swap-terminal-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start Tokio runtime");
            std::process::exit(1);
        }
    };
    let _enter = runtime.enter();

    let services = match Services::from_config(lib_core::config::core_config()) {
        Ok(services) => services,
        Err(e) => {
            error!(error = %e, "Failed to initialize services");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1366.0, 860.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    info!("Opening main window");
    let result = eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(TerminalApp::new(App::new(services))))),
    );

    if let Err(e) = result {
        error!(error = %e, "Window closed with error");
        std::process::exit(1);
    }
    info!("Swap terminal exited");
}
