#[cfg(test)]
pub(crate) use test_utils::*;

#[cfg(test)]
mod test_utils {
    /// Builds a `Vec<InlineNode>`.
    ///
    /// ```text
    /// inlines!["plain", em["emphasized"], strong["bold ", cite[1]], link["text"]("https://example.com"), soft]
    /// ```
    macro_rules! inlines {
        // Empty case
        [] => {
            Vec::<crate::md_elem::InlineNode>::new()
        };

        // String literal (optionally followed by more content)
        [$text:literal $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Text($text.to_string())];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [em[$($content:tt)*] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Emphasis(inlines![$($content)*])];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [strong[$($content:tt)*] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Strong(inlines![$($content)*])];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [del[$($content:tt)*] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Strikethrough(inlines![$($content)*])];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [link[$($display:tt)*] ($url:literal) $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Link {
                    destination: $url.to_string(),
                    children: inlines![$($display)*],
                }];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [code[$val:literal] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Code($val.to_string())];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [html[$val:literal] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Html($val.to_string())];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        // Citation, like `cite[1]`
        [cite[$num:literal] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::Citation($num)];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        // Artifact reference, like `artifact["Title", "id"]`
        [artifact[$title:literal, $id:literal] $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::ArtifactReference {
                    title: $title.to_string(),
                    id: $id.to_string(),
                }];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [soft $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::SoftBreak];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };

        [hard $(, $($rest:tt)*)?] => {
            {
                #[allow(unused_mut)]
                let mut result = vec![crate::md_elem::InlineNode::LineBreak];
                $(result.extend(inlines![$($rest)*]);)?
                result
            }
        };
    }
    pub(crate) use inlines;
}
