use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use multidoc::docker::container_runtime_path;
use multidoc::errors::exit_code_for_error;
use multidoc::pipeline::Pipeline;
use multidoc::util::ExecService;

mod cli;

use cli::{Cli, Command};

fn print_version() {
    println!("multidoc v{}", env!("CARGO_PKG_VERSION"));
    println!("  commit:  {}", env!("MULTIDOC_BUILD_COMMIT"));
    println!("  built:   {}", env!("MULTIDOC_BUILD_DATE"));
    println!("  rustc:   {}", env!("MULTIDOC_BUILD_RUSTC"));
    println!("  target:  {}", env!("MULTIDOC_BUILD_TARGET"));
    println!("  profile: {}", env!("MULTIDOC_BUILD_PROFILE"));
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = cli.to_configuration(&cwd).validate()?;
    debug!("run with configuration: {:?}", config);

    let runtime = container_runtime_path()?;
    debug!("docker: {}", runtime.display());

    let runner = ExecService::default();
    Pipeline::new(&config, &runner, runtime).run()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Command::Version) = cli.command {
        print_version();
        return ExitCode::SUCCESS;
    }

    multidoc::telemetry::telemetry_init(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("multidoc: error: {e:#}");
            ExitCode::from(exit_code_for_error(&e))
        }
    }
}
