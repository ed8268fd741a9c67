//! Terminal confirmation and notices

use std::io::{self, BufRead, Write};

use crate::mutation::{Confirmer, Notice, NoticeLevel, Notifier, Prompt};

/// Reads `y/N` from stdin, or confirms everything when `assume_yes` is set
pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &Prompt) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{}\n{}\n{} [y/N] ", prompt.title, prompt.text, prompt.confirm_label);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

/// Anything but an explicit yes cancels
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints notices; errors go to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice),
            NoticeLevel::Error => eprintln!("{}", notice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_assume_yes_skips_stdin() {
        let prompt = Prompt {
            title: "Are you sure?".to_string(),
            text: "You won't be able to revert this!".to_string(),
            confirm_label: "Yes, delete it!".to_string(),
        };
        assert!(StdinConfirmer::new(true).confirm(&prompt));
    }
}
