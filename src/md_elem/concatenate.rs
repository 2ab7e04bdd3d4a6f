/// Merges runs of neighbouring items that can be represented as a single item.
///
/// An `artifact:` link the base grammar claimed is turned back into text, which leaves it in a separate leaf from the
/// `@` (and any other text) before it. The custom syntax scanner only sees `@[Title](artifact:id)` once those leaves
/// are glued back together.
pub trait Concatenate: Sized {
    fn try_concatenate(&mut self, other: Self) -> Result<(), Self>;

    fn concatenate_similar(items: Vec<Self>) -> Vec<Self> {
        let mut results = Vec::with_capacity(items.len());
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return results;
        };
        results.push(first);

        for curr in iter {
            let Some(prev) = results.last_mut() else {
                results.push(curr);
                continue;
            };
            if let Err(new_segment) = prev.try_concatenate(curr) {
                results.push(new_segment);
            }
        }
        results
    }
}
