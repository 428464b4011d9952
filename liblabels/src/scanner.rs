//! Phase 1: Scanner
//!
//! The scanner splits a buffer at the first occurrence of any character from
//! a small delimiter set. It never fails; it only classifies. Both readers
//! are built on repeated scans, each of which strictly shrinks the buffer.

/// Result of scanning a buffer up to the next delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan<'a> {
    /// Text before the delimiter, or the whole buffer if none was found.
    pub consumed: &'a str,
    /// Text after the delimiter. The delimiter itself belongs to neither side.
    pub rest: &'a str,
    /// The delimiter that stopped the scan, `None` if the buffer ran out.
    pub delimiter: Option<char>,
}

/// Read up to the first character in `delimiters`, consuming it.
pub fn read_to_next<'a>(buf: &'a str, delimiters: &[char]) -> Scan<'a> {
    match buf.char_indices().find(|(_, ch)| delimiters.contains(ch)) {
        Some((i, ch)) => Scan {
            consumed: &buf[..i],
            rest: &buf[i + ch.len_utf8()..],
            delimiter: Some(ch),
        },
        None => Scan {
            consumed: buf,
            rest: "",
            delimiter: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_to_double_quote() {
        let scan = read_to_next(r#"my " string"#, &['"']);
        assert_eq!(scan.delimiter, Some('"'));
        assert_eq!(scan.consumed, "my ");
        assert_eq!(scan.rest, " string");
    }

    #[test]
    fn test_delimiter_at_start() {
        let scan = read_to_next(r#""my string"#, &['"']);
        assert_eq!(scan.consumed, "");
        assert_eq!(scan.rest, "my string");
    }

    #[test]
    fn test_delimiter_at_end() {
        let scan = read_to_next(r#"my string""#, &['"']);
        assert_eq!(scan.consumed, "my string");
        assert_eq!(scan.rest, "");
        assert_eq!(scan.delimiter, Some('"'));
    }

    #[test]
    fn test_repeated_scans() {
        let scan = read_to_next(r#"my" string""#, &['"']);
        assert_eq!(scan.consumed, "my");
        assert_eq!(scan.rest, " string\"");

        let scan = read_to_next(scan.rest, &['"']);
        assert_eq!(scan.consumed, " string");
        assert_eq!(scan.rest, "");
    }

    #[test]
    fn test_first_of_several_delimiters() {
        let scan = read_to_next(r#"my string""#, &['"', 's']);
        assert_eq!(scan.consumed, "my ");
        assert_eq!(scan.rest, "tring\"");
        assert_eq!(scan.delimiter, Some('s'));
    }

    #[test]
    fn test_no_delimiter() {
        let scan = read_to_next("plain", &['=', ' ']);
        assert_eq!(scan.consumed, "plain");
        assert_eq!(scan.rest, "");
        assert_eq!(scan.delimiter, None);

        let scan = read_to_next("", &['=']);
        assert_eq!(scan.consumed, "");
        assert_eq!(scan.delimiter, None);
    }

    #[test]
    fn test_multibyte_text_before_delimiter() {
        let scan = read_to_next("café=au lait", &['=']);
        assert_eq!(scan.consumed, "café");
        assert_eq!(scan.rest, "au lait");
    }
}
