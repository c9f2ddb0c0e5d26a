//! Streaming `@include` expander.
//!
//! Copies a byte stream to a destination, replacing every directive of the form
//!
//! ```text
//! @include "filename"
//! ```
//!
//! with the contents of the named file, expanded recursively. The space after
//! the keyword is optional and the filename may be wrapped in any of six pairs:
//! `" "`, `' '`, `< >`, `( )`, `[ ]`, `{ }`.
//!
//! # Fallback
//!
//! Anything that is not a complete, valid directive naming an openable file is
//! written through exactly as read. A doubled `@@` is copied unchanged and never
//! starts a directive. The output never gains or loses a byte relative to the
//! input apart from replaced directives.
//!
//! # Filenames
//!
//! - 1 to [`MAX_FILENAME_LEN`] bytes, no control bytes, no closer
//! - first byte must not be space, `.`, `/` or `\`
//! - resolved against [`ExpanderConfig::base_dir`]; backslashes are literal
//!
//! Includes are not checked for cycles. A file that includes itself recurses
//! until the stack runs out.
//!
//! # Example
//!
//! ```
//! let mut output: Vec<u8> = Vec::new();
//! incl_engine::expand(&b"mail me @ home, or @@ work"[..], &mut output).unwrap();
//! assert_eq!(output, b"mail me @ home, or @@ work");
//! ```

mod error;
mod expander;
mod state;
mod syntax;

use std::io::{Read, Write};

pub use error::ExpandError;
pub use expander::{ExpandReport, Expander, ExpanderConfig, OpenFileFn};
pub use syntax::{Delimiter, MAX_FILENAME_LEN, TRIGGER, is_valid_filename};

/// Expand `source` into `destination`, resolving includes against the
/// process working directory.
pub fn expand<R, W>(source: R, destination: &mut W) -> Result<(), ExpandError>
where
    R: Read,
    W: Write + ?Sized,
{
    Expander::new().expand(source, destination)?;
    Ok(())
}
