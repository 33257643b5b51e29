pub mod llm;
pub mod logs;

pub use logs::*;
