use anyhow::Result;

use crate::queries::types::Distribution;

/// Draws a bucketed score distribution. `render` blocks until the chart is
/// done being shown.
pub trait ChartRenderer {
    fn render(&mut self, distribution: &Distribution) -> Result<()>;
}
