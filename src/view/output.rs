use crossterm::queue;
use crossterm::style::Print;
use std::io::{self, Write};

/// Write a redraw frame, one line per entry, and flush.
pub fn write_frame<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        queue!(out, Print(line), Print("\n"))?;
    }
    out.flush()
}
