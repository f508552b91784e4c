//! Text decoding for property paths.
//!
//! The parser is a character-level state machine. It either produces the
//! whole path or a [`PathError`] naming the element being parsed when the
//! input went wrong; there is no partial result.

use std::num::IntErrorKind;

use thiserror::Error;

use super::{is_first_identifier_char, is_identifier_char, PathElement, PropertyPath};

/// An error produced while decoding a property path from text.
///
/// `segment` is the zero-based number of the path element being parsed and
/// `offset` is the byte offset of the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A character that is not allowed in the current position.
    #[error("parsing path element #{segment} at char #{offset} {ch:?}: {reason}")]
    UnexpectedChar {
        segment: usize,
        offset: usize,
        ch: char,
        reason: &'static str,
    },
    /// The input ended in the middle of an element.
    #[error("parsing path element #{segment}: {reason}")]
    Incomplete { segment: usize, reason: &'static str },
    /// The bracketed index could not be converted to an index.
    #[error("parsing path element #{segment}: {reason}: {value}")]
    InvalidIndex {
        segment: usize,
        reason: &'static str,
        value: String,
    },
}

impl PathError {
    /// Returns the number of the path element that failed to parse.
    pub fn segment(&self) -> usize {
        match self {
            PathError::UnexpectedChar { segment, .. }
            | PathError::Incomplete { segment, .. }
            | PathError::InvalidIndex { segment, .. } => *segment,
        }
    }

    /// Returns the byte offset of the offending character, if there is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            PathError::UnexpectedChar { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    BeginIdentifier,
    Identifier,
    BeginIndex,
    Index,
    BracketedName,
    EndBracketedName,
    CloseBracket,
}

struct Parser {
    elements: Vec<PathElement>,
    buffer: String,
    offset: usize,
    state: State,
    escaping: bool,
}

pub(crate) fn parse(encoded: &str) -> Result<PropertyPath, PathError> {
    if encoded.is_empty() {
        return Ok(PropertyPath::root());
    }

    let mut parser = Parser {
        elements: Vec::new(),
        buffer: String::new(),
        offset: 0,
        state: State::Initial,
        escaping: false,
    };

    for (offset, c) in encoded.char_indices() {
        parser.offset = offset;
        parser.next(c)?;
    }

    parser.finish()
}

impl Parser {
    fn next(&mut self, c: char) -> Result<(), PathError> {
        if self.escaping {
            return self.escaped(c);
        }

        match c {
            '[' => self.open_bracket(c),
            ']' => self.close_bracket(c),
            '0'..='9' => self.digit(c),
            '\'' => self.quote(c),
            '\\' => self.backslash(c),
            '.' => self.point(c),
            _ => self.other(c),
        }
    }

    fn escaped(&mut self, c: char) -> Result<(), PathError> {
        match c {
            '\\' | '\'' => {
                self.buffer.push(c);
                self.escaping = false;
                Ok(())
            }
            _ => Err(self.char_error(c, "unexpected escaped character")),
        }
    }

    fn open_bracket(&mut self, c: char) -> Result<(), PathError> {
        match self.state {
            State::Initial | State::CloseBracket => self.state = State::BeginIndex,
            State::Identifier => {
                self.add_property();
                self.state = State::BeginIndex;
            }
            State::BracketedName => self.buffer.push(c),
            _ => return Err(self.char_error(c, "unexpected open bracket")),
        }
        Ok(())
    }

    fn close_bracket(&mut self, c: char) -> Result<(), PathError> {
        match self.state {
            State::Index => {
                self.add_index()?;
                self.state = State::CloseBracket;
            }
            State::BracketedName => self.buffer.push(c),
            State::EndBracketedName => {
                self.add_property();
                self.state = State::CloseBracket;
            }
            _ => return Err(self.char_error(c, "unexpected close bracket")),
        }
        Ok(())
    }

    fn digit(&mut self, c: char) -> Result<(), PathError> {
        match self.state {
            State::BeginIndex | State::Index => self.state = State::Index,
            State::BracketedName | State::Identifier => {}
            State::Initial | State::BeginIdentifier => {
                return Err(self.char_error(c, "unexpected identifier character"))
            }
            State::CloseBracket | State::EndBracketedName => {
                return Err(self.char_error(c, "unexpected char"))
            }
        }
        self.buffer.push(c);
        Ok(())
    }

    fn point(&mut self, c: char) -> Result<(), PathError> {
        match self.state {
            State::Identifier => {
                self.add_property();
                self.state = State::BeginIdentifier;
            }
            State::BracketedName => self.buffer.push(c),
            State::CloseBracket => self.state = State::BeginIdentifier,
            _ => return Err(self.char_error(c, "unexpected point")),
        }
        Ok(())
    }

    fn quote(&mut self, c: char) -> Result<(), PathError> {
        match self.state {
            State::BeginIndex => self.state = State::BracketedName,
            State::BracketedName => self.state = State::EndBracketedName,
            _ => return Err(self.char_error(c, "unexpected quote")),
        }
        Ok(())
    }

    fn backslash(&mut self, c: char) -> Result<(), PathError> {
        if self.state != State::BracketedName {
            return Err(self.char_error(c, "unexpected backslash"));
        }
        self.escaping = true;
        Ok(())
    }

    fn other(&mut self, c: char) -> Result<(), PathError> {
        match self.state {
            State::BeginIndex | State::Index => {
                return Err(self.char_error(c, "unexpected array index character"))
            }
            State::Initial | State::BeginIdentifier => {
                if !is_first_identifier_char(c) {
                    return Err(self.char_error(c, "unexpected identifier character"));
                }
                self.state = State::Identifier;
            }
            State::Identifier => {
                if !is_identifier_char(c) {
                    return Err(self.char_error(c, "unexpected identifier character"));
                }
            }
            State::BracketedName => {}
            State::CloseBracket | State::EndBracketedName => {
                return Err(self.char_error(c, "unexpected char"))
            }
        }
        self.buffer.push(c);
        Ok(())
    }

    fn add_property(&mut self) {
        let name = std::mem::take(&mut self.buffer);
        self.elements.push(PathElement::Property(name));
    }

    fn add_index(&mut self) -> Result<(), PathError> {
        let index = match self.buffer.parse::<usize>() {
            Ok(index) if index <= isize::MAX as usize => index,
            Ok(_) => return Err(self.index_error("value out of range")),
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => {
                return Err(self.index_error("value out of range"))
            }
            Err(_) => return Err(self.index_error("invalid array index")),
        };
        self.buffer.clear();
        self.elements.push(PathElement::Index(index));
        Ok(())
    }

    fn finish(mut self) -> Result<PropertyPath, PathError> {
        match self.state {
            State::Identifier => self.add_property(),
            State::CloseBracket => {}
            State::BeginIdentifier => return Err(self.incomplete("incomplete property name")),
            State::BeginIndex | State::Index => {
                return Err(self.incomplete("incomplete array index"))
            }
            State::BracketedName | State::EndBracketedName => {
                return Err(self.incomplete("incomplete bracketed property name"))
            }
            State::Initial => return Err(self.incomplete("unexpected parsing state")),
        }
        Ok(PropertyPath::new(self.elements))
    }

    fn char_error(&self, ch: char, reason: &'static str) -> PathError {
        PathError::UnexpectedChar {
            segment: self.elements.len(),
            offset: self.offset,
            ch,
            reason,
        }
    }

    fn incomplete(&self, reason: &'static str) -> PathError {
        PathError::Incomplete {
            segment: self.elements.len(),
            reason,
        }
    }

    fn index_error(&self, reason: &'static str) -> PathError {
        PathError::InvalidIndex {
            segment: self.elements.len(),
            reason,
            value: self.buffer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(path: &PropertyPath) -> Vec<PathElement> {
        path.iter().cloned().collect()
    }

    #[test]
    fn test_empty_input_is_root() {
        assert!(parse("").unwrap().is_root());
    }

    #[test]
    fn test_parse_mixed_path() {
        let path = parse(r"a.b[3]['c\'d']").unwrap();
        assert_eq!(
            elements(&path),
            vec![
                PathElement::property("a"),
                PathElement::property("b"),
                PathElement::index(3),
                PathElement::property("c'd"),
            ]
        );
        assert_eq!(path.to_string(), r"a.b[3]['c\'d']");
    }

    #[test]
    fn test_parse_leading_index_and_bracketed_name() {
        let path = parse("[0]['first name'].x").unwrap();
        assert_eq!(
            elements(&path),
            vec![
                PathElement::index(0),
                PathElement::property("first name"),
                PathElement::property("x"),
            ]
        );
    }

    #[test]
    fn test_bracketed_name_keeps_special_chars() {
        let path = parse(r"['a.b[0]\\']").unwrap();
        assert_eq!(elements(&path), vec![PathElement::property(r"a.b[0]\")]);
    }

    #[test]
    fn test_empty_bracketed_name() {
        let path = parse("['']").unwrap();
        assert_eq!(elements(&path), vec![PathElement::property("")]);
        assert_eq!(path.to_string(), "['']");
    }

    #[test]
    fn test_unterminated_index() {
        let err = parse("a[").unwrap_err();
        assert_eq!(
            err,
            PathError::Incomplete {
                segment: 1,
                reason: "incomplete array index"
            }
        );
        assert_eq!(
            err.to_string(),
            "parsing path element #1: incomplete array index"
        );
    }

    #[test]
    fn test_unterminated_bracketed_name() {
        let err = parse("a['b").unwrap_err();
        assert_eq!(err.segment(), 1);
        assert!(err.to_string().contains("incomplete bracketed property name"));
    }

    #[test]
    fn test_trailing_point() {
        let err = parse("a.").unwrap_err();
        assert!(err.to_string().contains("incomplete property name"));
    }

    #[test]
    fn test_double_point() {
        let err = parse("a..b").unwrap_err();
        assert_eq!(err.offset(), Some(2));
        assert_eq!(err.segment(), 1);
    }

    #[test]
    fn test_leading_digit() {
        let err = parse("1a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "parsing path element #0 at char #0 '1': unexpected identifier character"
        );
    }

    #[test]
    fn test_non_numeric_index() {
        let err = parse("a[x]").unwrap_err();
        assert_eq!(err.offset(), Some(2));
        assert!(err.to_string().contains("unexpected array index character"));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = parse("a[99999999999999999999999]").unwrap_err();
        assert!(matches!(
            err,
            PathError::InvalidIndex {
                segment: 1,
                reason: "value out of range",
                ..
            }
        ));
    }

    #[test]
    fn test_index_above_signed_range() {
        let input = format!("[{}]", isize::MAX as usize + 1);
        let err = parse(&input).unwrap_err();
        assert!(err.to_string().contains("value out of range"));
    }

    #[test]
    fn test_empty_index() {
        let err = parse("a[]").unwrap_err();
        assert!(err.to_string().contains("unexpected close bracket"));
    }

    #[test]
    fn test_identifier_after_bracket_requires_point() {
        assert!(parse("a[0]b").is_err());
        assert!(parse("a[0].b").is_ok());
    }

    #[test]
    fn test_invalid_escape() {
        let err = parse(r"['a\b']").unwrap_err();
        assert!(err.to_string().contains("unexpected escaped character"));
    }

    #[test]
    fn test_backslash_outside_brackets() {
        assert!(parse(r"a\b").is_err());
    }

    #[test]
    fn test_unexpected_char_in_identifier() {
        let err = parse("a-b").unwrap_err();
        assert_eq!(err.offset(), Some(1));
    }

    #[test]
    fn test_unicode_offsets_are_bytes() {
        let err = parse("имя-").unwrap_err();
        assert_eq!(err.offset(), Some(6));
    }
}
