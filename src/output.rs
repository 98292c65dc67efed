// src/output.rs
// =============================================================================
// Progress lines on stdout.
//
// Progress is informational. If stdout is gone (e.g. piped into `head`) the
// write error is logged and dropped; println! would panic the calling task.
// =============================================================================

use std::fmt;
use std::io::{self, Write};

/// Writes one progress line to `out`, ignoring write failures.
pub fn write_line(out: &mut impl Write, line: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{}", line) {
        tracing::debug!(error = %e, "progress line not written");
    }
}

/// Writes one progress line to stdout.
pub fn progress(line: fmt::Arguments<'_>) {
    write_line(&mut io::stdout().lock(), line);
}
