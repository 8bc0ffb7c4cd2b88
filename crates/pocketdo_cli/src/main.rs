//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pocketdo_core` linkage without a UI shell.
//! - Optionally open a data directory and print what it holds.
//!
//! Usage: `pocketdo [DATA_DIR] [all|today|week|month]`

use pocketdo_core::{init_logging, open_service, CoreConfig, DateWindow};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("pocketdo_core ping={}", pocketdo_core::ping());
    println!("pocketdo_core version={}", pocketdo_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(data_dir) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let window = match args.next().map(|raw| raw.parse::<DateWindow>()).transpose() {
        Ok(window) => window.unwrap_or_default(),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = CoreConfig::new(data_dir);
    config.write_behind = false;
    let log_dir = config.log_dir();
    if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }
    let service = match open_service(&config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", config.data_dir.display());
            return ExitCode::FAILURE;
        }
    };

    println!(
        "tasks={} projects={} dangling_refs={}",
        service.tasks().len(),
        service.projects().len(),
        service.dangling_project_refs().len()
    );
    for task in service.filtered("", window) {
        let project = service
            .project_for(task)
            .map(|project| format!(" [{}]", project.name))
            .unwrap_or_default();
        println!("{} {} {} {}{project}", task.id, task.date, task.priority, task.title);
    }
    ExitCode::SUCCESS
}
