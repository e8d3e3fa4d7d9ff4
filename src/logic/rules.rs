/// A rule that fires when any of its keywords occurs in the input text.
///
/// Rules are evaluated as an ordered list; the first one that fires wins, so the
/// tie-break order is the order of the slice.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T: 'static> {
    /// Matched anywhere in the text
    pub keywords: &'static [&'static str],
    /// Matched only as a whole alphanumeric token, for short abbreviations
    pub tokens: &'static [&'static str],
    pub effect: T,
}

impl<T> KeywordRule<T> {
    pub const fn new(keywords: &'static [&'static str], effect: T) -> Self {
        Self {
            keywords,
            tokens: &[],
            effect,
        }
    }

    pub const fn with_tokens(mut self, tokens: &'static [&'static str]) -> Self {
        self.tokens = tokens;
        self
    }

    /// Expects `text` to already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
            || (!self.tokens.is_empty()
                && text
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| self.tokens.contains(&word)))
    }
}

/// Case-insensitive first-match evaluation over an ordered rule list.
pub fn first_match<'a, T>(rules: &'a [KeywordRule<T>], text: &str) -> Option<&'a KeywordRule<T>> {
    let lowered = text.to_lowercase();
    rules.iter().find(|rule| rule.matches(&lowered))
}
