use crate::error::ChordProError;

/// Token types for chord sheet text
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Lyric or plain text between brackets
    Text(String),
    /// Body of `[...]`
    Chord(String),
    /// Body of `{...}`
    Directive(String),
    /// Rest of a line that starts with `#`
    Comment(String),
    Newline,
}

/// A token with its position in the source
#[derive(Debug, Clone)]
pub struct LocatedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for tokenizing chord sheet text
///
/// Brackets and braces never span lines: an opener must be closed before the
/// end of its line, and neither may nest inside itself.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    position: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            position: 0,
            at_line_start: true,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn error(line: usize, column: usize, message: impl Into<String>) -> ChordProError {
        ChordProError::ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Consume characters up to (not including) the next one matching `stop`.
    fn take_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.position;
        while let Some(&c) = self.peek() {
            if stop(c) {
                break;
            }
            self.advance();
        }
        &input[start..self.position]
    }

    /// Read the body of a `[...]` or `{...}` group. The opener has not been consumed yet.
    fn read_group(&mut self, open: char, close: char, what: &str) -> Result<String, ChordProError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opener

        let body = self.take_until(|c| c == close || c == open || c == '\n' || c == '\r');

        match self.peek() {
            Some(&c) if c == close => {
                self.advance();
                Ok(body.to_string())
            }
            Some(&c) if c == open => Err(Self::error(
                self.line,
                self.column,
                format!("Nested '{}' inside {} opened at column {}", open, what, column),
            )),
            _ => Err(Self::error(
                line,
                column,
                format!("Unterminated {} '{}': missing '{}'", what, open, close),
            )),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<LocatedToken>, ChordProError> {
        let mut tokens = Vec::new();

        while let Some(&c) = self.peek() {
            let line = self.line;
            let column = self.column;

            let token = match c {
                '#' if self.at_line_start => {
                    self.advance();
                    let text = self.take_until(|c| c == '\n' || c == '\r');
                    Token::Comment(text.to_string())
                }
                '\n' => {
                    self.advance();
                    self.at_line_start = true;
                    tokens.push(LocatedToken {
                        token: Token::Newline,
                        line,
                        column,
                    });
                    continue;
                }
                '\r' => {
                    // CRLF and stray carriage returns carry no content
                    self.advance();
                    continue;
                }
                '[' => Token::Chord(self.read_group('[', ']', "chord")?),
                '{' => Token::Directive(self.read_group('{', '}', "directive")?),
                ']' => {
                    return Err(Self::error(line, column, "Unexpected ']' without matching '['"));
                }
                '}' => {
                    return Err(Self::error(line, column, "Unexpected '}' without matching '{'"));
                }
                _ => {
                    let text =
                        self.take_until(|c| matches!(c, '[' | ']' | '{' | '}' | '\n' | '\r'));
                    Token::Text(text.to_string())
                }
            };

            self.at_line_start = false;
            tokens.push(LocatedToken {
                token,
                line,
                column,
            });
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_chords_and_lyrics() {
        assert_eq!(
            token_types("[C]Hello [G]world"),
            vec![
                Token::Chord("C".into()),
                Token::Text("Hello ".into()),
                Token::Chord("G".into()),
                Token::Text("world".into()),
            ]
        );
    }

    #[test]
    fn test_directive_and_newline() {
        assert_eq!(
            token_types("{title: Test}\n[C]Hi"),
            vec![
                Token::Directive("title: Test".into()),
                Token::Newline,
                Token::Chord("C".into()),
                Token::Text("Hi".into()),
            ]
        );
    }

    #[test]
    fn test_comment_only_at_line_start() {
        assert_eq!(
            token_types("# note [C]\nla # not a comment"),
            vec![
                Token::Comment(" note [C]".into()),
                Token::Newline,
                Token::Text("la # not a comment".into()),
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            token_types("[Am]one\r\n[G]two"),
            vec![
                Token::Chord("Am".into()),
                Token::Text("one".into()),
                Token::Newline,
                Token::Chord("G".into()),
                Token::Text("two".into()),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("ab\n  [C]x");
        let tokens = lexer.tokenize().unwrap();
        let chord = tokens
            .iter()
            .find(|t| matches!(t.token, Token::Chord(_)))
            .unwrap();
        assert_eq!((chord.line, chord.column), (2, 3));
    }

    #[test]
    fn test_unterminated_directive() {
        let mut lexer = Lexer::new("{title: Test\n[C]la");
        let err = lexer.tokenize().unwrap_err();
        match err {
            ChordProError::ParseError {
                line,
                column,
                message,
            } => {
                assert_eq!((line, column), (1, 1));
                assert!(message.contains("Unterminated directive"));
            }
            _ => panic!("Expected ParseError"),
        }
    }

    #[test]
    fn test_unterminated_chord() {
        let mut lexer = Lexer::new("ok\nla [Am la");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(err.to_string().contains("Unterminated chord"));
    }

    #[test]
    fn test_nested_bracket() {
        let mut lexer = Lexer::new("[C[G]]");
        let err = lexer.tokenize().unwrap_err();
        assert!(err.to_string().contains("Nested '['"));
    }

    #[test]
    fn test_stray_closers() {
        assert!(Lexer::new("la ] la").tokenize().is_err());
        assert!(Lexer::new("la } la").tokenize().is_err());
    }

    #[test]
    fn test_brackets_inside_directive_are_text() {
        assert_eq!(
            token_types("{comment: play [C] softly}"),
            vec![Token::Directive("comment: play [C] softly".into())]
        );
    }
}
