pub mod choices;
pub mod config;
pub mod machine;
