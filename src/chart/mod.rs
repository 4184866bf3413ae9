mod renderer;
mod terminal;

pub use renderer::ChartRenderer;
pub use terminal::{BAR_WIDTH, TerminalHistogram};
