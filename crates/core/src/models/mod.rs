pub mod chart;
pub mod dashboard;
pub mod series;
pub mod settings;
