#![allow(clippy::must_use_candidate)]

mod context;

pub use context::RequestContext;
