//! CLI command implementations.

pub(crate) mod expand;

pub(crate) use expand::ExpandArgs;
