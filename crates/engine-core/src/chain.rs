//! Chain mode: an ordered list of catalog commands, each writing its output to
//! a destination, executed one after the other.
//!
//! Lifecycle: `Empty -> Building -> Executing -> {Completed, Failed}`. A chain
//! executes once; per-step failures end up in the returned report, while using
//! the chain in the wrong state is an immediate [`EngineError::InvalidState`].

use crate::{
    connection::Connection,
    error::EngineError,
    registry::{Command, CommandContext, CommandRegistry},
    sink::OutputSink,
};
use chrono::Utc;
use engine_config::{
    report::{
        step::{StepError, StepRecord, StepSubject},
        summary::{ExecutionReport, RunMode},
    },
    settings::ExecutionSettings,
};
use model::{
    catalog::Catalog,
    core::identifiers::{CommandId, RunId},
    execution::{
        command::CommandSpec,
        format::{Destination, OutputFormat},
    },
};
use std::{fmt, sync::Arc};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Empty,
    Building,
    Executing,
    Completed,
    Failed,
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChainState::Empty => "empty",
            ChainState::Building => "building",
            ChainState::Executing => "executing",
            ChainState::Completed => "completed",
            ChainState::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub struct CommandChain {
    registry: Arc<CommandRegistry>,
    sink: Arc<dyn OutputSink>,
    settings: ExecutionSettings,
    plan: Vec<CommandSpec>,
    state: ChainState,
}

impl CommandChain {
    pub fn new(registry: Arc<CommandRegistry>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            registry,
            sink,
            settings: ExecutionSettings::default(),
            plan: Vec::new(),
            state: ChainState::Empty,
        }
    }

    pub fn with_settings(mut self, settings: ExecutionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    pub fn plan(&self) -> &[CommandSpec] {
        &self.plan
    }

    pub fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    /// Appends a step. Only valid before execution.
    pub fn add_next(
        &mut self,
        command: impl Into<CommandId>,
        format: OutputFormat,
        destination: impl Into<Destination>,
    ) -> Result<&mut Self, EngineError> {
        self.add(CommandSpec::new(command, format, destination.into()))
    }

    pub fn add(&mut self, spec: CommandSpec) -> Result<&mut Self, EngineError> {
        self.ensure_open("add a step")?;
        self.plan.push(spec);
        self.state = ChainState::Building;
        Ok(self)
    }

    /// Runs every step in insertion order.
    ///
    /// Under the default `stop` policy the first failing step halts the chain
    /// and every later step is reported as skipped. Outputs already written are
    /// left in place.
    pub fn execute(
        &mut self,
        catalog: &Catalog,
        mut connection: Option<&mut dyn Connection>,
    ) -> Result<ExecutionReport, EngineError> {
        self.ensure_open("execute")?;
        self.state = ChainState::Executing;

        let run_id = RunId::generate();
        let started_at = Utc::now();
        info!(
            "Executing chain {} with {} step(s), on failure: {:?}",
            run_id,
            self.plan.len(),
            self.settings.on_step_failure
        );

        let steps = match self.preflight() {
            Some(steps) => steps,
            None => {
                let mut steps = Vec::with_capacity(self.plan.len());
                let mut halted = false;

                for (i, spec) in self.plan.iter().enumerate() {
                    let subject = StepSubject::Command { spec: spec.clone() };
                    if halted {
                        steps.push(StepRecord::skipped(subject));
                        continue;
                    }

                    match self.run_step(spec, catalog, connection.as_deref_mut()) {
                        Ok(detail) => {
                            info!("Step {} `{}` succeeded ({})", i + 1, spec, detail);
                            steps.push(StepRecord::succeeded(subject, Some(detail)));
                        }
                        Err(err) => {
                            error!("Step {} `{}` failed: {}", i + 1, spec, err);
                            steps.push(StepRecord::failed(subject, err.to_step_error()));
                            halted = self.settings.stops_on_failure();
                        }
                    }
                }
                steps
            }
        };

        let report = ExecutionReport::finish(run_id, RunMode::Chain, started_at, steps);
        self.state = if report.is_success() {
            ChainState::Completed
        } else {
            ChainState::Failed
        };
        info!("Chain {} finished: {:?}", report.run_id, report.status);
        Ok(report)
    }

    fn ensure_open(&self, operation: &'static str) -> Result<(), EngineError> {
        match self.state {
            ChainState::Empty | ChainState::Building => Ok(()),
            state => Err(EngineError::InvalidState {
                operation,
                state: state.to_string(),
            }),
        }
    }

    /// Resolves every step and checks its format up front. On the first
    /// problem returns the final step records: that step failed, all others
    /// skipped.
    fn preflight(&self) -> Option<Vec<StepRecord>> {
        if !self.settings.preflight {
            return None;
        }

        let (failed_at, err) = self
            .plan
            .iter()
            .enumerate()
            .find_map(|(i, spec)| self.check(spec).err().map(|err| (i, err)))?;

        warn!("Preflight rejected step {} `{}`: {}", failed_at + 1, self.plan[failed_at], err);
        let error: StepError = err.to_step_error();
        let steps = self
            .plan
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let subject = StepSubject::Command { spec: spec.clone() };
                if i == failed_at {
                    StepRecord::failed(subject, error.clone())
                } else {
                    StepRecord::skipped(subject)
                }
            })
            .collect();
        Some(steps)
    }

    /// The command a step resolves to, provided it supports the step's format.
    fn check(&self, spec: &CommandSpec) -> Result<Arc<dyn Command>, EngineError> {
        let command = self.registry.resolve(spec.command.as_str())?;
        if !command.supports(spec.format) {
            return Err(EngineError::UnsupportedFormat {
                command: spec.command.to_string(),
                format: spec.format,
            });
        }
        Ok(command)
    }

    fn run_step(
        &self,
        spec: &CommandSpec,
        catalog: &Catalog,
        connection: Option<&mut (dyn Connection + '_)>,
    ) -> Result<String, EngineError> {
        let command = self.check(spec)?;

        let mut ctx = CommandContext::new(catalog, spec.format, connection);
        let content = command.produce(&mut ctx)?;
        self.sink.write(&spec.destination, spec.format, &content)?;

        Ok(format!("{} bytes", content.len()))
    }
}

impl fmt::Debug for CommandChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandChain")
            .field("state", &self.state)
            .field("plan", &self.plan)
            .field("settings", &self.settings)
            .finish()
    }
}
