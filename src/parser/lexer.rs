//! Lexer (tokenizer) for tape language source
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Only the eight command characters produce tokens; everything else is a
//! comment and is skipped without leaving a trace in the stream.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors and the
/// source map can point at the exact character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Gt(SourceLocation),       // >
    Lt(SourceLocation),       // <
    Plus(SourceLocation),     // +
    Minus(SourceLocation),    // -
    Comma(SourceLocation),    // ,
    Dot(SourceLocation),      // .
    LBracket(SourceLocation), // [
    RBracket(SourceLocation), // ]

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Gt(loc)
            | Token::Lt(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Comma(loc)
            | Token::Dot(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    fn from_char(c: char, loc: SourceLocation) -> Option<Token> {
        match c {
            '>' => Some(Token::Gt(loc)),
            '<' => Some(Token::Lt(loc)),
            '+' => Some(Token::Plus(loc)),
            '-' => Some(Token::Minus(loc)),
            ',' => Some(Token::Comma(loc)),
            '.' => Some(Token::Dot(loc)),
            '[' => Some(Token::LBracket(loc)),
            ']' => Some(Token::RBracket(loc)),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Gt(_) => write!(f, "'>'"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer for tape language source
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Never fails: any character that is not a command is a comment.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            let loc = self.current_location();
            self.advance();
            if let Some(token) = Token::from_char(c, loc) {
                tokens.push(token);
            }
        }

        tokens.push(Token::Eof(self.current_location()));
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tokens() {
        let mut lexer = Lexer::new("><+-,.[]");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0], Token::Gt(_)));
        assert!(matches!(tokens[1], Token::Lt(_)));
        assert!(matches!(tokens[2], Token::Plus(_)));
        assert!(matches!(tokens[3], Token::Minus(_)));
        assert!(matches!(tokens[4], Token::Comma(_)));
        assert!(matches!(tokens[5], Token::Dot(_)));
        assert!(matches!(tokens[6], Token::LBracket(_)));
        assert!(matches!(tokens[7], Token::RBracket(_)));
        assert!(matches!(tokens[8], Token::Eof(_)));
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("add one + then print it .");
        let tokens = lexer.tokenize();

        // Should skip everything but the commands
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], Token::Plus(_)));
        assert!(matches!(tokens[1], Token::Dot(_)));
        assert!(matches!(tokens[2], Token::Eof(_)));
    }

    #[test]
    fn test_locations() {
        let mut lexer = Lexer::new("+\n  [x]\n");
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location(), SourceLocation::new(2, 3));
        assert_eq!(tokens[2].location(), SourceLocation::new(2, 5));
        assert_eq!(tokens[3].location(), SourceLocation::new(3, 1));
    }

    #[test]
    fn test_multibyte_comments_count_as_one_column() {
        let mut lexer = Lexer::new("é+");
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 2));
    }

    #[test]
    fn test_empty_input() {
        let mut lexer = Lexer::new("");
        let tokens = lexer.tokenize();

        assert_eq!(tokens, vec![Token::Eof(SourceLocation::new(1, 1))]);
    }
}
