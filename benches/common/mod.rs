pub mod criterion_config;
pub mod matrix;
