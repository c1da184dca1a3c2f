//! Scripted tool runner and recording feedback for tests

use crate::feedback::ImportFeedback;
use crate::tool::{ToolInvocation, ToolRunner};
use efdesign_core::{EngineError, EngineResult};
use std::collections::VecDeque;

enum Step {
    Exit { code: i32, artifact: String },
    LaunchFailure,
}

/// Replays exit codes and writes the scripted artifact text to the
/// invocation's output file
#[derive(Default)]
pub struct ScriptedRunner {
    steps: VecDeque<Step>,
    pub invocations: Vec<ToolInvocation>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a run that writes `artifact` and exits with `code`
    pub fn then(mut self, code: i32, artifact: &str) -> Self {
        self.steps.push_back(Step::Exit {
            code,
            artifact: artifact.to_string(),
        });
        self
    }

    /// Queue a run whose executable cannot be started
    pub fn then_launch_failure(mut self) -> Self {
        self.steps.push_back(Step::LaunchFailure);
        self
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> EngineResult<i32> {
        self.invocations.push(invocation.clone());

        match self.steps.pop_front() {
            Some(Step::Exit { code, artifact }) => {
                std::fs::write(&invocation.output, artifact)?;
                Ok(code)
            }
            Some(Step::LaunchFailure) => Err(EngineError::ToolLaunch {
                tool: invocation.tool.clone(),
                message: "No such file or directory".to_string(),
            }),
            None => Err(EngineError::internal(format!(
                "Unscripted run of {}",
                invocation.tool.display()
            ))),
        }
    }
}

/// Records every message and answers choices with a fixed value
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    pub statuses: Vec<String>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
    pub choices: Vec<(String, Vec<String>)>,
    answer: Option<String>,
}

impl RecordingFeedback {
    /// Feedback that cancels every choice
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback that picks `answer` for every choice
    pub fn choosing(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            ..Self::default()
        }
    }
}

impl ImportFeedback for RecordingFeedback {
    fn show_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn show_info(&mut self, text: &str) {
        self.infos.push(text.to_string());
    }

    fn show_error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }

    fn get_choice(&mut self, prompt: &str, options: &[String]) -> Option<String> {
        self.choices.push((prompt.to_string(), options.to_vec()));
        self.answer.clone()
    }
}
