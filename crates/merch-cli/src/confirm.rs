use std::io::{BufRead, Write};

use merch_core::PublishResult;
use merch_pipeline::PublishConfirmation;

/// Asks on the terminal. EOF, a read error, or anything other than `y`/`yes`
/// declines.
pub(crate) struct StdinConfirmation;

impl PublishConfirmation for StdinConfirmation {
    fn confirm(&mut self, result: &PublishResult) -> bool {
        let id = result.external_id.as_deref().unwrap_or("unknown");
        print!("Product {id} was created as a draft. Make it active now? [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&line),
        }
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
