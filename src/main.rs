use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod console;
mod context;
mod doctor;
mod manifest;
mod pipeline;
mod step;
mod tools;
mod workdir;

use cli::{Command, DoctorArgs, ProvisionArgs, RootArgs};
use context::RunContext;
use step::{Disposition, StdinPrompt};

fn main() {
    let args = RootArgs::parse();
    init_tracing(args.verbose);
    let code = match run(args) {
        Ok(code) => code,
        Err(err) => {
            console::error(&format!("{err:#}"));
            1
        }
    };
    std::process::exit(code);
}

fn run(args: RootArgs) -> Result<i32> {
    match args.command {
        Command::Provision(args) => cmd_provision(args),
        Command::Doctor(args) => cmd_doctor(args),
    }
}

fn cmd_provision(args: ProvisionArgs) -> Result<i32> {
    let site_type = args
        .site_type
        .as_deref()
        .map(config::SiteType::parse)
        .transpose()?;
    let config = config::load(&config::LoadOptions {
        config_path: args.config.as_deref(),
        env_file: args.env_file.as_deref(),
        site_type,
    })?;
    let steps = pipeline::build(&config);
    let mut ctx = RunContext::new(config);
    let mut prompt = StdinPrompt;
    let outcome = step::run_steps(steps, &mut ctx, &mut prompt, args.debug)?;
    Ok(match outcome.disposition {
        Disposition::Completed => {
            console::success("provisioning complete");
            0
        }
        Disposition::Aborted => 0,
        Disposition::Failed { .. } => 1,
    })
}

fn cmd_doctor(args: DoctorArgs) -> Result<i32> {
    let config = config::assemble(&config::LoadOptions {
        config_path: args.config.as_deref(),
        env_file: args.env_file.as_deref(),
        site_type: None,
    })?;
    Ok(if doctor::run(&config) { 0 } else { 1 })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
