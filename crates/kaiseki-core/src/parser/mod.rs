pub mod helper;
pub mod number;
pub mod tokenizer;
pub mod unified;

mod context;
mod passes;

pub use number::NumberPatterns;
pub use tokenizer::Tokenizer;
pub use unified::{parse, ParseOptions, Parser, DEFAULT_DELIMITERS};
