//! Interactive confirmation.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::Result;

/// Asks the operator a yes/no question.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompts on the terminal; the default answer is no.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(answer)
    }
}

/// Answers every prompt the same way without asking.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmation(pub bool);

impl Confirmation for FixedConfirmation {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}
