//! Value normalization shared by every ingestion path.
//!
//! - [`date`]: turns heterogeneous date cells into a [`chrono::NaiveDate`].
//! - [`text`]: Turkish-aware case folding and character-safe truncation.

pub mod date;
pub mod text;
