//! The inline node model, the base-grammar reader that produces it, and the custom syntax tokenizer.
pub(crate) mod concatenate;
mod custom_syntax;
mod tree;

pub use custom_syntax::*;
pub use tree::*;

#[cfg(test)]
mod tree_test_utils;
#[cfg(test)]
pub(crate) use tree_test_utils::*;
