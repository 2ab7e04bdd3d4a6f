use url::Url;

/// The resources that `[n]` citations point to.
///
/// Citation `n` resolves to entry `n - 1`. A context can be absent altogether ([`CitationContext::none`]), and
/// individual entries can be empty; either way, the citation simply has no resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CitationContext {
    urls: Option<Vec<Option<Url>>>,
}

impl CitationContext {
    /// No citation resolves to anything.
    pub fn none() -> Self {
        Self { urls: None }
    }

    pub fn new(urls: Vec<Option<Url>>) -> Self {
        Self { urls: Some(urls) }
    }

    /// Looks up the resource for a 1-based citation number.
    ///
    /// Any number is fine, including zero and negatives; those just don't resolve.
    ///
    /// ```
    /// use mdcite::output::CitationContext;
    /// use url::Url;
    ///
    /// let first = Url::parse("https://example.com/1").unwrap();
    /// let ctx = CitationContext::new(vec![Some(first.clone()), None]);
    /// assert_eq!(ctx.resolve(1), Some(&first));
    /// assert_eq!(ctx.resolve(2), None);
    /// assert_eq!(ctx.resolve(3), None);
    /// assert_eq!(ctx.resolve(0), None);
    /// ```
    pub fn resolve(&self, number: i64) -> Option<&Url> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        self.urls.as_ref()?.get(index)?.as_ref()
    }

    /// The number of entries, including empty ones. Zero if there's no context at all.
    pub fn len(&self) -> usize {
        self.urls.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Url> for CitationContext {
    fn from_iter<T: IntoIterator<Item = Url>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Some).collect())
    }
}

impl FromIterator<Option<Url>> for CitationContext {
    fn from_iter<T: IntoIterator<Item = Option<Url>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
