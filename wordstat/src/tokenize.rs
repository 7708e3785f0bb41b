//! Splitting input into words.

/// Returns `true` for bytes that can be part of a word.
#[inline(always)]
fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'\'' || byte == b'_'
}

/// Iterator over the words of a byte string, see [`words`].
#[derive(Clone, Debug)]
pub struct Words<'a> {
    input: &'a [u8],
}

/// Returns an iterator over the maximal runs of word bytes in `input`.
///
/// Word bytes are ASCII letters and digits, `'` and `_`. Everything else, including all non-ASCII
/// bytes, separates words.
pub fn words(input: &[u8]) -> Words<'_> {
    Words { input }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.input.iter().position(|&byte| is_word_byte(byte))?;
        let rest = &self.input[start..];
        let len = rest
            .iter()
            .position(|&byte| !is_word_byte(byte))
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(len);
        self.input = tail;
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separators() {
        let input = b"Hello, World!  it's a_b\n\tc3po\xc3\xa9x";
        let found = Vec::from_iter(words(input));
        let expected: Vec<&[u8]> = vec![b"Hello", b"World", b"it's", b"a_b", b"c3po", b"x"];
        assert_eq!(found, expected);
    }

    #[test]
    fn empty_and_separator_only() {
        assert_eq!(words(b"").next(), None);
        assert_eq!(words(b" .,;\n").next(), None);
        assert_eq!(Vec::from_iter(words(b"word")), vec![&b"word"[..]]);
    }
}
