// src/prompt.rs
// =============================================================================
// Interactive questions, used when no URL is given on the command line.
//
// Every function takes its input and output streams as parameters so the
// tests can feed answers from a byte slice instead of a terminal.
// =============================================================================

use crate::error::{CrawlError, Result};
use std::io::{self, BufRead, Write};

// Reads one line; EOF counts as a failed read
fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CrawlError::Input(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no input",
        )));
    }
    Ok(line)
}

/// Asks for the seed URL. Returns the first word typed.
pub fn ask_for_url(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    writeln!(output, "Let's check for dead links! Enter your URL here: ")?;
    output.flush()?;

    let line = read_line(input)?;
    line.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| {
            CrawlError::Input(io::Error::new(io::ErrorKind::InvalidInput, "no URL entered"))
        })
}

/// Asks whether external domains should be checked. Anything but y/n means no.
pub fn ask_check_external(input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    writeln!(
        output,
        "Check external domains? y/n [n will only check the entered host domain]"
    )?;
    output.flush()?;

    let line = read_line(input)?;
    match line.trim().to_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => {
            writeln!(output, "Invalid input. Defaulting to 'n'.")?;
            Ok(false)
        }
    }
}

/// Keeps the window open until the user presses Enter.
pub fn wait_for_enter(input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    writeln!(output, "\nDone! Press Enter to exit...")?;
    output.flush()?;
    // EOF is fine here, there is nothing left to do
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
