//! Confparse: indentation-structured configuration parsing
//!
//! Parses network-device style configurations (Cisco IOS and friends) into a
//! parent/child line tree and answers structural queries over it.
//!
//! # Architecture
//!
//! Every input line becomes exactly one [`ConfigLine`] stored in an arena and
//! addressed by its line index. Building runs once, in batch:
//!
//! 1. indentation extraction ([`line`])
//! 2. first-child detection, family endpoints, orphan recovery ([`tree`])
//! 3. multiline block folding such as banners ([`block`])
//!
//! The resulting [`ConfigTree`] is immutable; [`QueryEngine`] borrows it for
//! read-only queries. File loading and line splitting live in [`source`].
//!
//! # Example
//!
//! ```
//! use confparse::{compile, ConfigTree, ParseOptions};
//!
//! let text = "interface Serial1/0\n encapsulation ppp\n!\n";
//! let tree = ConfigTree::from_text(text, &ParseOptions::default()).unwrap();
//!
//! let lines = tree.query().find_children(&compile("^interface").unwrap());
//! assert_eq!(lines, vec!["interface Serial1/0", " encapsulation ppp"]);
//! ```

pub mod block;
pub mod cache;
pub mod config;
pub mod line;
pub mod query;
pub mod source;
pub mod tree;

// Re-exports
pub use block::{BlockAnnotation, BlockError, BlockSpec, Terminator};
pub use config::{discover, load_from_path, load_from_str, ConfigError, Settings};
pub use line::{ConfigLine, LineShape};
pub use query::{compile, LineMatcher, Literal, Predicate, QueryEngine, QueryError};
pub use source::{parse_path, read_lines, split_lines, SourceError};
pub use tree::{BuildError, ConfigTree, ParseOptions};
