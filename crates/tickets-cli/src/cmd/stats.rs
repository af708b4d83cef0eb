//! `tickets stats`: how many tickets sit in each status.

use crate::cmd::surface;
use crate::output::{OutputMode, render};
use std::io::{self, Write};
use tickets_core::Status;
use tickets_core::store::{StatusCounts, TicketStore};

pub fn run_stats(output: OutputMode, store: &TicketStore) -> anyhow::Result<()> {
    let counts = surface(output, store.stats())?;
    render(output, &counts, |c, w| render_stats_human(c, w))
}

fn render_stats_human(counts: &StatusCounts, w: &mut dyn Write) -> io::Result<()> {
    if counts.total == 0 {
        return writeln!(w, "No tickets");
    }

    writeln!(w, "Total: {} tickets", counts.total)?;
    writeln!(w)?;
    for (status, count) in counts.iter().filter(|(_, count)| *count > 0) {
        #[allow(clippy::cast_precision_loss)]
        let pct = count as f64 / counts.total as f64 * 100.0;
        writeln!(w, "  {} {status}: {count} ({pct:.0}%)", Status::icon_for(status))?;
    }
    Ok(())
}
