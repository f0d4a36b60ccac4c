pub mod element;
pub mod result;
pub mod token;

pub use element::{ElementCategory, Elements};
pub use result::{ElementValue, ParseResult};
pub use token::{Token, TokenCategory, TokenFlags, Tokens};
