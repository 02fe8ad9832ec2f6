//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the parse error types and the
//! [`parse`] convenience entry point.
//!
//! # Parser Architecture
//!
//! The grammar is tiny, so there is no precedence handling and no lookahead:
//!
//! ```text
//! program := element* EOF
//! element := ">" | "<" | "+" | "-" | "," | "." | loop
//! loop    := "[" element* "]"
//! ```
//!
//! Loops are built with an explicit stack of open bodies instead of recursive
//! descent, so nesting depth is limited only by available memory. Errors do not
//! stop the parse: a stray `]` is reported and skipped, and every loop still
//! open at end of input is reported, so one pass yields every problem.

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token};
use std::fmt;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Every parse error found in a source text, ordered by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

/// A loop whose closing bracket has not been seen yet
struct OpenLoop {
    location: SourceLocation,
    body: Vec<Command>,
}

/// Parser for tape language source
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        Self {
            tokens: lexer.tokenize(),
            position: 0,
        }
    }

    /// Parse the whole token stream into a [`Program`]
    pub fn parse_program(&mut self) -> Result<Program, ParseErrors> {
        let mut source_map = SourceMap::new();
        let commands = self.parse_sequence(Some(&mut source_map))?;
        let program = Program {
            commands,
            source_map,
        };
        debug!(
            commands = program.command_count(),
            depth = program.max_depth(),
            "parsed program"
        );
        Ok(program)
    }

    /// Parse the whole token stream into its command sequence, without
    /// building a source map.
    ///
    /// Source map keys hold a full path per command, so their total size grows
    /// with nesting depth; this form stays linear in the input.
    pub fn parse_commands(&mut self) -> Result<Vec<Command>, ParseErrors> {
        self.parse_sequence(None)
    }

    fn parse_sequence(
        &mut self,
        mut source_map: Option<&mut SourceMap>,
    ) -> Result<Vec<Command>, ParseErrors> {
        let mut top: Vec<Command> = Vec::new();
        let mut open: Vec<OpenLoop> = Vec::new();
        // Index of each open loop within its enclosing sequence
        let mut path: CommandPath = Vec::new();
        let mut errors = Vec::new();

        loop {
            let token = self.advance();
            let location = token.location();

            let leaf = match token {
                Token::Gt(_) => Command::MoveRight,
                Token::Lt(_) => Command::MoveLeft,
                Token::Plus(_) => Command::Increment,
                Token::Minus(_) => Command::Decrement,
                Token::Comma(_) => Command::ReadInput,
                Token::Dot(_) => Command::WriteOutput,
                Token::LBracket(_) => {
                    let index = current_sequence(&mut top, &mut open).len();
                    path.push(index);
                    if let Some(map) = source_map.as_deref_mut() {
                        map.record_command(path.clone(), location);
                    }
                    open.push(OpenLoop {
                        location,
                        body: Vec::new(),
                    });
                    continue;
                }
                Token::RBracket(_) => {
                    match open.pop() {
                        Some(finished) => {
                            if let Some(map) = source_map.as_deref_mut() {
                                map.record_loop_end(path.clone(), location);
                            }
                            path.pop();
                            current_sequence(&mut top, &mut open)
                                .push(Command::Loop(finished.body));
                        }
                        None => errors.push(ParseError {
                            message: "unmatched ']' with no open loop".to_string(),
                            location,
                        }),
                    }
                    continue;
                }
                Token::Eof(_) => break,
            };

            let seq = current_sequence(&mut top, &mut open);
            if let Some(map) = source_map.as_deref_mut() {
                let mut leaf_path = path.clone();
                leaf_path.push(seq.len());
                map.record_command(leaf_path, location);
            }
            seq.push(leaf);
        }

        for unclosed in &open {
            errors.push(ParseError {
                message: "unterminated loop: '[' has no matching ']'".to_string(),
                location: unclosed.location,
            });
        }

        if !errors.is_empty() {
            errors.sort_by_key(|e| (e.location.line, e.location.column));
            debug!(count = errors.len(), "parse failed");
            return Err(ParseErrors { errors });
        }

        Ok(top)
    }

    // ===== Helper methods =====

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek_token();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek_token(&self) -> Token {
        // The lexer always terminates the stream with Eof
        self.tokens[self.position.min(self.tokens.len() - 1)]
    }
}

/// The sequence new commands are appended to: the innermost open loop body,
/// or the top level when no loop is open.
fn current_sequence<'a>(
    top: &'a mut Vec<Command>,
    open: &'a mut [OpenLoop],
) -> &'a mut Vec<Command> {
    match open.last_mut() {
        Some(innermost) => &mut innermost.body,
        None => top,
    }
}

/// Parse source text into its command sequence
pub fn parse(source: &str) -> Result<Vec<Command>, ParseErrors> {
    Parser::new(source).parse_commands()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_program() {
        let commands = parse("><+-,.").unwrap();

        assert_eq!(
            commands,
            vec![
                Command::MoveRight,
                Command::MoveLeft,
                Command::Increment,
                Command::Decrement,
                Command::ReadInput,
                Command::WriteOutput,
            ]
        );
    }

    #[test]
    fn test_parse_loop() {
        assert_eq!(parse("[+]").unwrap(), vec![Command::Loop(vec![Command::Increment])]);
        assert_eq!(
            parse("[[]]").unwrap(),
            vec![Command::Loop(vec![Command::Loop(vec![])])]
        );
    }

    #[test]
    fn test_unterminated_loop() {
        let err = parse("[+").unwrap_err();

        assert_eq!(err.len(), 1);
        assert_eq!(err.errors[0].location, SourceLocation::new(1, 1));
        assert!(err.errors[0].message.contains("unterminated loop"));
    }

    #[test]
    fn test_unmatched_close() {
        let err = parse("+]").unwrap_err();

        assert_eq!(err.len(), 1);
        assert_eq!(err.errors[0].location, SourceLocation::new(1, 2));
        assert!(err.errors[0].message.contains("unmatched"));
    }

    #[test]
    fn test_errors_sorted_by_position() {
        let err = parse("[ ] ] [").unwrap_err();

        assert_eq!(err.len(), 2);
        assert_eq!(err.errors[0].location, SourceLocation::new(1, 5));
        assert_eq!(err.errors[1].location, SourceLocation::new(1, 7));

        let err = parse("[\n]]").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors[0].location, SourceLocation::new(2, 2));
    }

    #[test]
    fn test_source_map() {
        let mut parser = Parser::new("+\n[ > . ]");
        let program = parser.parse_program().unwrap();
        let map = &program.source_map;

        assert_eq!(map.command(&[0]), Some(SourceLocation::new(1, 1)));
        assert_eq!(map.command(&[1]), Some(SourceLocation::new(2, 1)));
        assert_eq!(map.command(&[1, 0]), Some(SourceLocation::new(2, 3)));
        assert_eq!(map.command(&[1, 1]), Some(SourceLocation::new(2, 5)));
        assert_eq!(map.loop_end(&[1]), Some(SourceLocation::new(2, 7)));
        assert_eq!(map.command(&[2]), None);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_program_metrics() {
        let mut parser = Parser::new("+[>[-]<]");
        let program = parser.parse_program().unwrap();

        assert_eq!(program.command_count(), 6);
        assert_eq!(program.max_depth(), 2);
    }
}
