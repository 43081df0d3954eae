//! Input view over an immutable source buffer.
//!
//! Combinators never copy the remaining text: an [`Input`] is the whole source
//! plus an offset, so advancing and slicing are O(1) and every match value is a
//! borrowed slice of the original buffer.

/// The unconsumed part of a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Input<'a> {
    source: &'a str,
    offset: usize,
}

impl<'a> Input<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, offset: 0 }
    }

    /// The full buffer this view points into.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Position of this view in the source, in UTF-8 code units.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The remaining, unconsumed text.
    pub fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub fn len(&self) -> usize {
        self.source.len() - self.offset
    }

    /// The view past the next `length` units.
    ///
    /// `length` always comes from a successful match at this position, so it
    /// lands on a character boundary within the buffer.
    pub fn advance(&self, length: usize) -> Self {
        Self {
            source: self.source,
            offset: self.offset + length,
        }
    }

    /// The next `length` units, without consuming them.
    pub fn take(&self, length: usize) -> &'a str {
        &self.source[self.offset..self.offset + length]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_take_share_the_buffer() {
        let input = Input::new("abcdef");
        let rest = input.advance(2);
        assert_eq!(rest.offset(), 2);
        assert_eq!(rest.rest(), "cdef");
        assert_eq!(rest.take(3), "cde");
        assert_eq!(rest.len(), 4);
        assert_eq!(rest.source(), "abcdef");
    }

    #[test]
    fn test_empty_at_end() {
        let input = Input::new("ab").advance(2);
        assert!(input.is_empty());
        assert_eq!(input.rest(), "");
        assert!(Input::new("").is_empty());
    }
}
