//! Multiline block annotation.
//!
//! Some constructs, such as IOS banners, span several lines without using
//! indentation. Annotation folds them into the same parent/child shape the
//! indentation passes produce, so every query treats them alike.

pub mod annotator;
pub mod errors;
pub mod spec;

pub use annotator::BlockAnnotation;
pub(crate) use annotator::annotate;
pub use errors::BlockError;
pub use spec::{BlockSpec, Terminator, IOS_BANNERS};
