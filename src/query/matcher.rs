use regex::Regex;

/// Decides whether a line's text matches a pattern.
///
/// The query engine never interprets patterns itself; anything implementing
/// this trait can drive a query.
pub trait LineMatcher {
    fn is_match(&self, text: &str) -> bool;
}

impl LineMatcher for Regex {
    fn is_match(&self, text: &str) -> bool {
        Regex::is_match(self, text)
    }
}

impl<M: LineMatcher + ?Sized> LineMatcher for &M {
    fn is_match(&self, text: &str) -> bool {
        (**self).is_match(text)
    }
}

impl<M: LineMatcher + ?Sized> LineMatcher for Box<M> {
    fn is_match(&self, text: &str) -> bool {
        (**self).is_match(text)
    }
}

/// Case-sensitive substring match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(pub String);

impl Literal {
    pub fn new(needle: impl Into<String>) -> Self {
        Self(needle.into())
    }
}

impl LineMatcher for Literal {
    fn is_match(&self, text: &str) -> bool {
        text.contains(self.0.as_str())
    }
}

/// Wraps a closure as a matcher.
pub struct Predicate<F>(pub F);

impl<F> Predicate<F>
where
    F: Fn(&str) -> bool,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> LineMatcher for Predicate<F>
where
    F: Fn(&str) -> bool,
{
    fn is_match(&self, text: &str) -> bool {
        (self.0)(text)
    }
}
