mod config;
mod iterative;

pub use config::IterativeConfig;
pub use iterative::IterativeResolver;
