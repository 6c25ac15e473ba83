/// Utility functions for user interaction.
use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Ask before deleting `ids`; `force` skips the prompt.
pub fn confirm_deletion(ids: &[String], force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    let stdin = io::stdin();
    confirm_with(ids, &mut stdin.lock(), &mut io::stdout())
}

fn confirm_with(ids: &[String], input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    writeln!(output, "About to delete {} item(s):", ids.len())?;
    for id in ids.iter().take(5) {
        writeln!(output, "  {id}")?;
    }
    if ids.len() > 5 {
        writeln!(output, "  ... and {} more", ids.len() - 5)?;
    }
    write!(output, "Continue? (y/N): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
