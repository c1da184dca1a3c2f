//! User-facing feedback sinks for an import pass

/// Status, info, error and choice collaborators.
///
/// The import engine reports through this trait and owns no UI of its own.
pub trait ImportFeedback {
    /// Transient progress text
    fn show_status(&mut self, text: &str);

    /// Informational message
    fn show_info(&mut self, text: &str);

    /// Error message
    fn show_error(&mut self, text: &str);

    /// Ask the user to pick one of `options`. `None` means cancelled.
    fn get_choice(&mut self, prompt: &str, options: &[String]) -> Option<String>;
}

/// Feedback that only writes to the log.
///
/// Non-interactive: every choice is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl ImportFeedback for LogFeedback {
    fn show_status(&mut self, text: &str) {
        tracing::debug!("{}", text);
    }

    fn show_info(&mut self, text: &str) {
        tracing::info!("{}", text);
    }

    fn show_error(&mut self, text: &str) {
        tracing::error!("{}", text);
    }

    fn get_choice(&mut self, prompt: &str, options: &[String]) -> Option<String> {
        tracing::warn!("{} ({} options); no chooser available", prompt, options.len());
        None
    }
}
