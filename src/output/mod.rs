//! Composing inlines into styled text, and writing the results.
mod citations;
mod compose;
mod fmt_plain;
mod fmt_plain_str;
mod styled_text;
mod theme;

pub use citations::*;
pub use compose::*;
pub use fmt_plain::*;
pub(crate) use fmt_plain_str::*;
pub use styled_text::*;
pub use theme::*;
