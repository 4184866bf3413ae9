use anyhow::Result;
use std::io::Write;

use super::renderer::ChartRenderer;
use crate::queries::types::Distribution;

/// Characters used by the fullest bin.
pub const BAR_WIDTH: usize = 40;

/// Text histogram written to any [`Write`] sink, one row per bin.
pub struct TerminalHistogram<W: Write> {
    out: W,
}

impl<W: Write> TerminalHistogram<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TerminalHistogram<W> {
    fn render(&mut self, distribution: &Distribution) -> Result<()> {
        let peak = distribution.counts.iter().copied().max().unwrap_or(0);
        let last = distribution.counts.len().saturating_sub(1);

        writeln!(self.out, "{} score distribution", distribution.assignment)?;
        for (i, (&count, lo_hi)) in distribution
            .counts
            .iter()
            .zip(distribution.edges.windows(2))
            .enumerate()
        {
            let close = if i == last { ']' } else { ')' };
            let bar = if peak == 0 { 0 } else { count * BAR_WIDTH / peak };
            writeln!(
                self.out,
                "[{:>3}, {:>3}{} {:>4} {}",
                lo_hi[0],
                lo_hi[1],
                close,
                count,
                "#".repeat(bar)
            )?;
        }
        if distribution.excluded > 0 {
            writeln!(self.out, "({} outside range)", distribution.excluded)?;
        }

        self.out.flush()?;
        Ok(())
    }
}
