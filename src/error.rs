//! Error taxonomy shared by every part of the client.
//!
//! Every failure observed by the client is normalized into an [`ApiError`]
//! through [`classify`], so callers only ever match on an [`ErrorKind`].

#[path = "error/kind.rs"]
mod kind;

#[path = "error/descriptor.rs"]
mod descriptor;

#[path = "error/classify.rs"]
mod classify;

pub use classify::{classify, Failure};
pub use descriptor::ApiError;
pub use kind::ErrorKind;

#[cfg(test)]
mod tests;
