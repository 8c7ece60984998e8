//! Step orchestration with an interactive debug gate.
//!
//! A pipeline is an ordered list of named steps. In debug mode the operator
//! is prompted before every step and can run it, skip it, or abort the whole
//! run. Failures are classified by a per-step policy fixed at construction
//! time; there is no retry logic anywhere.

use crate::console;
use crate::context::RunContext;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Failure halts the run and the process exits non-zero.
    Fatal,
    /// Failure is reported as a warning and the run continues.
    NonFatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Skipped,
    Aborted,
    Failed(String),
}

/// Operator choice at the debug gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Skip,
    Abort,
}

impl Decision {
    /// Any input other than `s`/`q` (case-insensitive, including empty)
    /// proceeds.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("s") {
            Decision::Skip
        } else if trimmed.eq_ignore_ascii_case("q") {
            Decision::Abort
        } else {
            Decision::Proceed
        }
    }
}

pub trait OperatorPrompt {
    fn ask(&mut self, name: &str, description: &str) -> Result<Decision>;
}

/// Blocking stdin prompt used for real runs.
pub struct StdinPrompt;

impl OperatorPrompt for StdinPrompt {
    fn ask(&mut self, name: &str, description: &str) -> Result<Decision> {
        let mut stdout = io::stdout();
        write!(
            stdout,
            "next step: {name} ({description})\npress Enter to run, s to skip, q to quit: "
        )
        .context("write prompt")?;
        stdout.flush().context("flush prompt")?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read operator input")?;
        Ok(Decision::from_input(&line))
    }
}

pub struct Step {
    name: String,
    description: String,
    policy: FailurePolicy,
    action: Box<dyn FnMut(&mut RunContext) -> Result<()>>,
}

impl Step {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        action: impl FnMut(&mut RunContext) -> Result<()> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            policy: FailurePolicy::Fatal,
            action: Box::new(action),
        }
    }

    pub fn non_fatal(
        name: impl Into<String>,
        description: impl Into<String>,
        action: impl FnMut(&mut RunContext) -> Result<()> + 'static,
    ) -> Self {
        Self {
            policy: FailurePolicy::NonFatal,
            ..Self::new(name, description, action)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }
}

/// How a run ended; drives the process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Completed,
    /// Operator abort at the debug gate is a clean exit, not an error.
    Aborted,
    Failed { step: String },
}

pub struct RunOutcome {
    pub results: Vec<StepResult>,
    pub disposition: Disposition,
}

/// Run the pipeline in order, one result per attempted step.
pub fn run_steps(
    steps: Vec<Step>,
    ctx: &mut RunContext,
    prompt: &mut dyn OperatorPrompt,
    debug: bool,
) -> Result<RunOutcome> {
    let mut results = Vec::new();
    for mut step in steps {
        if debug {
            match prompt.ask(step.name(), step.description())? {
                Decision::Proceed => {}
                Decision::Skip => {
                    console::warning(&format!("{} skipped", step.name));
                    results.push(StepResult::Skipped);
                    continue;
                }
                Decision::Abort => {
                    console::info("stopping at operator request");
                    results.push(StepResult::Aborted);
                    return Ok(RunOutcome {
                        results,
                        disposition: Disposition::Aborted,
                    });
                }
            }
        }
        console::info(&step.description);
        tracing::debug!(step = step.name.as_str(), "step start");
        match (step.action)(ctx) {
            Ok(()) => {
                console::success(&step.name);
                results.push(StepResult::Continue);
            }
            Err(err) => {
                let reason = format!("{err:#}");
                results.push(StepResult::Failed(reason.clone()));
                match step.policy() {
                    FailurePolicy::NonFatal => {
                        console::warning(&format!("{}: {reason} (continuing)", step.name));
                    }
                    FailurePolicy::Fatal => {
                        console::error(&format!("{}: {reason}", step.name));
                        return Ok(RunOutcome {
                            results,
                            disposition: Disposition::Failed {
                                step: step.name.clone(),
                            },
                        });
                    }
                }
            }
        }
    }
    Ok(RunOutcome {
        results,
        disposition: Disposition::Completed,
    })
}
