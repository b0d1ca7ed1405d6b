//! taskmill - Asynchronous task execution engine
//!
//! This is the main entry point for the taskmill binary. It wires the
//! task queue, the single-consumer executor loop and the controller
//! facade together, then hands the session to the interactive console
//! (or to the scripted demo).

mod cli;
mod config;
mod console;
mod controller;
mod error;
mod executor;
mod logging;
mod queue;
mod task;
mod version;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use crate::cli::{Cli, Commands};
use crate::config::TaskmillConfig;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::executor::{Executor, ExecutorConfig};
use crate::queue::{FifoQueue, SharedQueue};
use crate::task::{FactorialWork, FibonacciWork};

fn main() -> Result<()> {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    // For commands that don't need full logging, use simple setup
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            // Config commands use minimal logging
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone(), cli.config.as_deref());
        }
        _ => {}
    }

    // Load config for run/demo (or use defaults)
    let config = match TaskmillConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Use formatted error for terminal
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    };

    // Execute the appropriate command
    match cli.command {
        Commands::Run => {
            // Initialize logging with config settings.
            // The guards must be kept alive for the lifetime of the program.
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

            // Log version info at startup
            let build = version::build_info();
            info!(
                version = %build.full_version(),
                target = %build.target,
                profile = %build.profile,
                "Starting taskmill"
            );

            run_engine(config)?;
        }
        Commands::Demo { fibonacci, factorial } => {
            // Keep the demo's stdout to the report itself
            logging::init_simple(tracing::Level::WARN)?;
            if let Err(e) = run_demo(config, fibonacci, factorial) {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
        }
        Commands::Version | Commands::Config { .. } => {
            // Already handled above
            unreachable!();
        }
    }

    Ok(())
}

/// Build the engine from configuration: queue, executor, controller
fn build_engine(config: &TaskmillConfig) -> (Arc<Controller>, Arc<Executor>) {
    let queue: SharedQueue = Arc::new(FifoQueue::new());

    let executor_config = ExecutorConfig {
        idle_delay: Duration::from_millis(config.executor.poll_interval_ms),
        start_enabled: config.executor.start_enabled,
        max_history: config.executor.max_history,
    };
    let executor = Arc::new(Executor::new(Arc::clone(&queue), executor_config));
    let controller = Arc::new(Controller::new(queue, Arc::clone(&executor)));

    (controller, executor)
}

/// Run the engine with the interactive console
fn run_engine(config: TaskmillConfig) -> Result<()> {
    info!(
        poll_interval_ms = config.executor.poll_interval_ms,
        start_enabled = config.executor.start_enabled,
        max_history = config.executor.max_history,
        "Configuration loaded"
    );

    // Build and run the tokio runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(num_cpus::get().min(4))
        .thread_name("taskmill")
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    let result = runtime.block_on(async_engine_main(config));

    // A console session ended by Ctrl+C can leave a blocking stdin
    // read in flight that cannot be cancelled; don't wait it out.
    runtime.shutdown_background();

    result
}

/// Async engine main: spawn the executor loop, run the console,
/// then shut the loop down
async fn async_engine_main(config: TaskmillConfig) -> Result<()> {
    let (controller, executor) = build_engine(&config);

    let loop_handle = {
        let executor = Arc::clone(&executor);
        tokio::spawn(async move { executor.run().await })
    };
    info!("Executor loop started");

    // The console owns the session until quit, EOF or Ctrl+C
    console::run(Arc::clone(&controller)).await?;

    // Latch shutdown and wait for the loop to finish its iteration.
    // A task that never observes cancellation keeps the loop (and
    // this join) busy until it returns.
    controller.request_shutdown();
    if let Err(e) = loop_handle.await {
        error!(error = %e, "Executor loop panicked");
    }

    info!(
        completed = executor.completed_count(),
        "Engine shut down"
    );
    Ok(())
}

/// Run a scripted demo: schedule one Fibonacci and one Factorial task,
/// wait for both to finish, print the completed-tasks report
fn run_demo(config: TaskmillConfig, fibonacci: i64, factorial: i64) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

    runtime.block_on(async move {
        let (controller, executor) = build_engine(&config);

        controller.schedule(Box::new(FibonacciWork::new(fibonacci)))?;
        controller.schedule(Box::new(FactorialWork::new(factorial)))?;

        let loop_handle = {
            let executor = Arc::clone(&executor);
            tokio::spawn(async move { executor.run().await })
        };

        // Wait on the processed total, not the history length: a
        // retention cap may trim the history below the task count.
        while executor.processed_count() < 2 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        print!("{}", controller.completed_tasks_info());

        controller.request_shutdown();
        loop_handle
            .await
            .map_err(|e| Error::Internal(format!("Executor loop panicked: {}", e)))?;
        Ok(())
    })
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: cli::ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    use cli::ConfigSubcommand;

    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = TaskmillConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            config::init_config(path.as_deref(), force)?;
        }
        ConfigSubcommand::Validate => match TaskmillConfig::load(config_path) {
            Ok(_) => {
                println!("Configuration is valid.");
            }
            Err(e) => {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
        },
    }

    Ok(())
}
