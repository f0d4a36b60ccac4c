//! # Kaiseki Core
//!
//! Keyword-driven metadata extraction from anime and media release file
//! names. A name is split into bracket, delimiter and word tokens, known
//! keywords are claimed first, and a fixed series of passes recovers the
//! episode number, title, release group and episode title from what is
//! left.
//!
//! ## Quick Start
//!
//! ```rust
//! use kaiseki_core::{ElementCategory, ParseOptions, Parser};
//!
//! let parser = Parser::new(ParseOptions::default()).unwrap();
//! let result = parser.parse("[Ayu]_Kiddy_Grade_2_-_Pilot_[H264_AC3][650B731B].mkv");
//!
//! assert!(result.success);
//! assert_eq!(result.get(ElementCategory::AnimeTitle), Some("Kiddy Grade 2"));
//! assert_eq!(result.get(ElementCategory::EpisodeTitle), Some("Pilot"));
//! assert_eq!(result.get(ElementCategory::ReleaseGroup), Some("Ayu"));
//! assert_eq!(result.get(ElementCategory::FileChecksum), Some("650B731B"));
//! ```
pub mod error;
pub mod keyword;
pub mod parser;
pub mod types;

// Re-export primary API
pub use error::{KaisekiError, Result};
pub use keyword::{KeywordManager, KeywordOptions};
pub use parser::{parse, ParseOptions, Parser, Tokenizer};
pub use types::{ElementCategory, ElementValue, Elements, ParseResult, Token, TokenCategory, Tokens};
