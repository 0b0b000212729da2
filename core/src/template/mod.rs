//! Multi-slot template splicing.
//!
//! A template is a literal JSON/XML document containing up to nine
//! `<base64-N>` tokens. Each token is replaced, in order, by the Base64
//! encoding of one content source, and the output length can be computed
//! up front from the raw content lengths alone.

pub mod scan;
pub mod splice;

pub use scan::{placeholder_token, split_segments};
pub use splice::{Splice, Template};
