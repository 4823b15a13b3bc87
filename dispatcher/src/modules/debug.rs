use std::io::{Result, Write};

use crossterm::{queue, terminal};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use shared_resources::cabin_state::CabinState;
use shared_resources::config::NUM_CABINS;

use crate::utilities::status_board::StatusRow;

const COLUMN_WIDTH: usize = 20;

fn state_color(state: CabinState) -> Color {
    match state {
        CabinState::MovingUp | CabinState::MovingDown => Color::Yellow,
        CabinState::OpeningDoors | CabinState::ClosingDoors => Color::Cyan,
        CabinState::IdleOpen => Color::Green,
        CabinState::IdleClosed => Color::Reset,
    }
}

fn separator<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "+------------")?;
    for _ in 0..NUM_CABINS {
        write!(out, "+{}", "-".repeat(COLUMN_WIDTH + 2))?;
    }
    writeln!(out, "+")
}

/// Prints the whole status board, top level first.
pub fn print_board<W: Write>(out: &mut W, rows: &[StatusRow]) -> Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::FromCursorDown))?;

    separator(out)?;
    write!(out, "| {0:<10} ", "LEVEL")?;
    for id in 0..NUM_CABINS {
        write!(out, "| {0:<width$} ", format!("CABIN {}", id), width = COLUMN_WIDTH)?;
    }
    writeln!(out, "|")?;

    for row in rows.iter().rev() {
        separator(out)?;
        write!(out, "| {0:<10} ", row.level)?;
        for report in row.cabins.iter() {
            let cell = format!("{:>2} {}", report.level, report.state);
            write!(out, "| ")?;
            queue!(
                out,
                SetForegroundColor(state_color(report.state)),
                Print(format!("{0:<width$}", cell, width = COLUMN_WIDTH)),
                ResetColor
            )?;
            write!(out, " ")?;
        }
        writeln!(out, "|")?;
    }
    separator(out)?;
    out.flush()
}
