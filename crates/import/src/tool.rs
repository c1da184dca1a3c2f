//! # External parser invocation
//!
//! Parser tools are invoked as
//!
//! ```text
//! <tool> "<input>" "<output>" ["<choice>"]
//! ```
//!
//! and report through their exit code. The output file holds the parsed
//! document on success, a list of candidate names when the request is
//! ambiguous, and diagnostic text otherwise.

use crate::feedback::ImportFeedback;
use efdesign_core::{EngineError, EngineResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Prompt shown when a tool finds several candidate contexts
pub const AMBIGUITY_PROMPT: &str = "Multiple classes found. Pick one to process";

// ============================================================================
// ToolExit
// ============================================================================

/// Typed exit code of a parser tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolExit {
    /// `0`: the document was written
    Success,
    /// `-1`: the user cancelled
    Cancelled,
    /// `1`: wrong argument count; an internal defect
    BadArgumentCount,
    /// `2`: this tool cannot read the input; try the next one
    NotApplicable,
    /// `3`: the output file could not be written
    CannotWriteOutput,
    /// `4`: the context object could not be constructed
    CannotCreateContext,
    /// `5`: no usable constructor was found
    NoEntryPoint,
    /// `6`: several candidates; invoke again with a choice
    Ambiguous,
    /// Any other code
    Unexpected(i32),
}

impl ToolExit {
    /// Decode an exit code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ToolExit::Success,
            -1 => ToolExit::Cancelled,
            1 => ToolExit::BadArgumentCount,
            2 => ToolExit::NotApplicable,
            3 => ToolExit::CannotWriteOutput,
            4 => ToolExit::CannotCreateContext,
            5 => ToolExit::NoEntryPoint,
            6 => ToolExit::Ambiguous,
            other => ToolExit::Unexpected(other),
        }
    }

    /// Encode as an exit code
    pub fn code(&self) -> i32 {
        match self {
            ToolExit::Success => 0,
            ToolExit::Cancelled => -1,
            ToolExit::BadArgumentCount => 1,
            ToolExit::NotApplicable => 2,
            ToolExit::CannotWriteOutput => 3,
            ToolExit::CannotCreateContext => 4,
            ToolExit::NoEntryPoint => 5,
            ToolExit::Ambiguous => 6,
            ToolExit::Unexpected(code) => *code,
        }
    }

    /// Message for the error sink, for the codes that are failures
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            ToolExit::Success | ToolExit::Cancelled | ToolExit::NotApplicable => None,
            ToolExit::BadArgumentCount => Some("Internal error"),
            ToolExit::CannotWriteOutput => Some("Cannot write temporary working file"),
            ToolExit::CannotCreateContext => Some("Cannot create DbContext object"),
            ToolExit::NoEntryPoint => Some("Cannot find appropriate constructor"),
            ToolExit::Ambiguous | ToolExit::Unexpected(_) => Some("Unexpected error"),
        }
    }

    /// Check if the tool accepted the input
    pub fn is_applicable(&self) -> bool {
        *self != ToolExit::NotApplicable
    }
}

impl From<i32> for ToolExit {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<ToolExit> for i32 {
    fn from(exit: ToolExit) -> Self {
        exit.code()
    }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolExit::Success => write!(f, "success"),
            ToolExit::Cancelled => write!(f, "cancelled"),
            ToolExit::BadArgumentCount => write!(f, "bad argument count"),
            ToolExit::NotApplicable => write!(f, "not applicable"),
            ToolExit::CannotWriteOutput => write!(f, "cannot write output"),
            ToolExit::CannotCreateContext => write!(f, "cannot create context"),
            ToolExit::NoEntryPoint => write!(f, "no entry point"),
            ToolExit::Ambiguous => write!(f, "ambiguous request"),
            ToolExit::Unexpected(code) => write!(f, "unexpected exit code {}", code),
        }
    }
}

// ============================================================================
// ToolInvocation
// ============================================================================

/// Arguments of one tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: PathBuf,
    pub input: String,
    pub output: PathBuf,
    pub choice: Option<String>,
}

impl ToolInvocation {
    /// Create an invocation; surrounding quotes on the input are dropped
    pub fn new(tool: impl Into<PathBuf>, input: &str, output: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            input: input.trim_matches('"').to_string(),
            output: output.into(),
            choice: None,
        }
    }

    /// The same invocation with a disambiguating choice
    pub fn with_choice(&self, choice: impl Into<String>) -> Self {
        Self {
            choice: Some(choice.into()),
            ..self.clone()
        }
    }

    /// Command-line arguments
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.input.clone(),
            self.output.to_string_lossy().into_owned(),
        ];
        args.extend(self.choice.clone());
        args
    }
}

// ============================================================================
// ToolRunner
// ============================================================================

/// Runs a parser tool to completion and returns its raw exit code
pub trait ToolRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> EngineResult<i32>;
}

/// Runs tools as child processes, blocking until they exit
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

impl ToolRunner for ProcessToolRunner {
    fn run(&mut self, invocation: &ToolInvocation) -> EngineResult<i32> {
        tracing::debug!(
            "Running {} {:?}",
            invocation.tool.display(),
            invocation.args()
        );

        let status = Command::new(&invocation.tool)
            .args(invocation.args())
            .status()
            .map_err(|e| EngineError::ToolLaunch {
                tool: invocation.tool.clone(),
                message: e.to_string(),
            })?;

        status
            .code()
            .ok_or_else(|| EngineError::ToolTerminated(invocation.tool.clone()))
    }
}

// ============================================================================
// Invocation with disambiguation
// ============================================================================

/// Run a tool, asking the user to disambiguate when it finds several
/// candidates.
///
/// On an ambiguous result the output file lists the candidates one per line.
/// The chosen one is passed to a second run of the same tool, whose exit code
/// is returned as is. A cancelled choice yields [`ToolExit::Cancelled`].
pub fn invoke_parser<R, F>(
    runner: &mut R,
    feedback: &mut F,
    invocation: &ToolInvocation,
) -> EngineResult<ToolExit>
where
    R: ToolRunner + ?Sized,
    F: ImportFeedback + ?Sized,
{
    let exit = ToolExit::from_code(runner.run(invocation)?);
    if exit != ToolExit::Ambiguous {
        return Ok(exit);
    }

    let candidates = read_candidates(&invocation.output)?;
    tracing::debug!("{} candidate contexts", candidates.len());

    match feedback.get_choice(AMBIGUITY_PROMPT, &candidates) {
        Some(choice) => {
            let exit = runner.run(&invocation.with_choice(choice))?;
            Ok(ToolExit::from_code(exit))
        }
        None => Ok(ToolExit::Cancelled),
    }
}

/// Non-empty lines of an artifact
fn read_candidates(path: &Path) -> EngineResult<Vec<String>> {
    let text = read_artifact(path)?;
    Ok(text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Read the text a tool left in its output file
pub fn read_artifact(path: &Path) -> EngineResult<String> {
    std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
