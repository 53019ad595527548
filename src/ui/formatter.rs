//! Console formatting for progress events and messages.

use console::style;

use crate::domain::ReleasePlan;
use crate::ui::{ProgressEvent, ProgressSink};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the versions, tag, and commit messages a run would produce.
pub fn display_plan(plan: &ReleasePlan, tag: &str, pre_message: &str, post_message: &str) {
    println!("\n{}", style("Release plan:").bold());
    println!("  Current: {}", style(&plan.current).red());
    println!("  Release: {}", style(&plan.release).green());
    println!("  Next:    {}", style(&plan.next).cyan());
    println!("  Tag:     {}", tag);
    println!("  Commits: \"{}\", \"{}\"", pre_message, post_message);
}

/// Progress sink that prints styled lines to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: &ProgressEvent) {
        if event.is_failure() {
            eprintln!("{} {}", style("✗").red(), event);
        } else if event.is_action() {
            display_success(&event.to_string());
        } else {
            display_status(&event.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Phase;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_console_sink_accepts_all_kinds() {
        // Visual verification test - output is printed to stdout/stderr
        let sink = ConsoleSink;
        sink.emit(&ProgressEvent::PhaseStarted(Phase::PreRelease));
        sink.emit(&ProgressEvent::Tagged {
            phase: Phase::PreRelease,
            tag: "releases/v1.0.0".to_string(),
        });
        sink.emit(&ProgressEvent::PhaseFailed {
            phase: Phase::PreRelease,
            error: "boom".to_string(),
        });
    }
}
