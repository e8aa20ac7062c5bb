use crate::domain::ports::Confirmation;
use crate::utils::error::{LiquidationError, Result};
use dialoguer::Input;
use rust_decimal::Decimal;

/// Word the operator must type before live orders go out.
pub const CONFIRM_WORD: &str = "CONFIRM";

pub fn is_confirmed(answer: &str) -> bool {
    answer.trim() == CONFIRM_WORD
}

/// Asks on the terminal; anything but the exact word cancels.
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, item_count: usize, total_usd: Decimal) -> Result<bool> {
        println!(
            "\n⚠️  You are about to liquidate {} cryptocurrencies worth ~${:.2}",
            item_count, total_usd
        );
        println!("This action cannot be undone!");

        let answer: String = Input::new()
            .with_prompt(format!("Type '{}' to proceed", CONFIRM_WORD))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| LiquidationError::IoError(std::io::Error::other(e.to_string())))?;

        Ok(is_confirmed(&answer))
    }
}
