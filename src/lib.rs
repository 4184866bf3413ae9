pub mod chart;
pub mod menu;
pub mod model;
pub mod output;
pub mod parser;
pub mod queries;
