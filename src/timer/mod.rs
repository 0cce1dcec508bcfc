pub mod calculator;
pub mod model;
pub mod state;
