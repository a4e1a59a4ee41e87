//! # Lexer
//!
//! Longest-match tokenizer over a buffered source text, driven by the merged
//! NFA of a rule set. Whitespace and comments are consumed but produce no
//! tokens; input no rule accepts surfaces as an `Unknown` token rather than
//! an error, so the parser decides how to react. Identifier and number
//! lexemes are interned into the lexer's own symbol table.

mod rules;
mod token;

pub use rules::{RuleSet, COMMENT, WHITESPACE};
pub use token::{Token, TokenKind};

use crate::symbol_table::{Entry, SymbolTable};

pub struct Lexer<'a> {
    rules: &'a RuleSet,
    buffer: Vec<u8>,
    forward: usize,
    line_no: usize,
    symbols: SymbolTable,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &str, rules: &'a RuleSet) -> Lexer<'a> {
        Lexer {
            rules,
            buffer: input.as_bytes().to_vec(),
            forward: 0,
            line_no: 1,
            symbols: SymbolTable::new(),
        }
    }

    /// Lexer over the builtin Decaf rule set.
    pub fn decaf(input: &str) -> Lexer<'static> {
        Lexer::new(input, RuleSet::decaf())
    }

    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// The interning table. Holds one placeholder entry per distinct
    /// identifier or number lexeme seen so far.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Produce the next token, skipping whitespace and comments. Returns an
    /// `Eoi` token once the buffer is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.forward >= self.buffer.len() {
                return Token::eoi(self.line_no);
            }

            let Some(found) = self.rules.nfa().longest_match(&self.buffer[self.forward..]) else {
                // no rule accepts even one symbol here: report the character
                let lexeme = (self.buffer[self.forward] as char).to_string();
                if self.buffer[self.forward] == b'\n' {
                    self.line_no += 1;
                }
                self.forward += 1;
                return Token {
                    kind: TokenKind::Unknown,
                    lexeme,
                    line: self.line_no,
                    entry: None,
                };
            };

            let end = self.forward + found.len;
            let lexeme = String::from_utf8_lossy(&self.buffer[self.forward..end]).into_owned();
            self.line_no += self.buffer[self.forward..end]
                .iter()
                .filter(|&&byte| byte == b'\n')
                .count();
            self.forward = end;

            if found.code == WHITESPACE || found.code == COMMENT {
                continue;
            }

            let kind = TokenKind::from_code(found.code).unwrap_or(TokenKind::Unknown);
            let entry = match kind {
                TokenKind::Identifier | TokenKind::Number => Some(self.intern(&lexeme)),
                _ => None,
            };
            return Token {
                kind,
                lexeme,
                line: self.line_no,
                entry,
            };
        }
    }

    fn intern(&mut self, name: &str) -> String {
        if self.symbols.lookup("", name).is_none() {
            self.symbols.add(Entry::interned(name));
        }
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::decaf(input);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eoi {
                return kinds;
            }
            kinds.push(token.kind);
        }
    }

    fn lexemes(input: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::decaf(input);
        let mut lexemes = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eoi {
                return lexemes;
            }
            lexemes.push((token.kind, token.lexeme));
        }
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        assert_eq!(vec![TokenKind::Int], kinds("int"));
        assert_eq!(vec![TokenKind::Identifier], kinds("integer"));
        assert_eq!(vec![TokenKind::Identifier], kinds("classstatic"));
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(vec![TokenKind::Increment], kinds("++"));
        assert_eq!(vec![TokenKind::Plus, TokenKind::Plus], kinds("+ +"));
        assert_eq!(vec![TokenKind::Ge], kinds(">="));
        assert_eq!(vec![TokenKind::Gt, TokenKind::Assign], kinds("> ="));
        assert_eq!(vec![TokenKind::Neq, TokenKind::Not], kinds("!=!"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            vec![
                (TokenKind::Int, "int".to_string()),
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Assign, "=".to_string()),
                (TokenKind::Number, "1345.13".to_string()),
                (TokenKind::Real, "real".to_string()),
                (TokenKind::Identifier, "my_var_name".to_string()),
                (TokenKind::Assign, "=".to_string()),
                (TokenKind::Number, "13.4E+9".to_string()),
                (TokenKind::Minus, "-".to_string()),
                (TokenKind::Number, "13".to_string()),
            ],
            lexemes("int x = 1345.13\n\treal my_var_name = 13.4E+9 - 13")
        );
    }

    #[test]
    fn test_comments_produce_no_tokens() {
        assert_eq!(
            vec![TokenKind::Identifier, TokenKind::Identifier],
            kinds("a /* comment */ b")
        );
        // a second opener inside a comment is no opener at all
        assert_eq!(
            vec![TokenKind::Identifier],
            kinds("/* outer /* still the same comment */ x")
        );
        assert_eq!(
            vec![TokenKind::Identifier, TokenKind::Identifier],
            kinds("a /* spans\nseveral\nlines */ b")
        );
    }

    #[test]
    fn test_unterminated_comment_is_unknown() {
        assert_eq!(
            vec![(TokenKind::Unknown, "/* unterminated".to_string())],
            lexemes("/* unterminated")
        );
        assert_eq!(vec![(TokenKind::Unknown, "/*".to_string())], lexemes("/*"));
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier
            ],
            kinds("a / b")
        );
    }

    #[test]
    fn test_unknown_characters_are_reported() {
        assert_eq!(
            vec![
                (TokenKind::Identifier, "a".to_string()),
                (TokenKind::Unknown, "@".to_string()),
                (TokenKind::Identifier, "b".to_string()),
            ],
            lexemes("a @ b")
        );
    }

    #[test]
    fn test_line_counting() {
        let mut lexer = Lexer::decaf("a\n\nb");
        assert_eq!(1, lexer.next_token().line);
        let second = lexer.next_token();
        assert_eq!("b", second.lexeme);
        assert_eq!(3, second.line);
    }

    #[test]
    fn test_interning() {
        let mut lexer = Lexer::decaf("x = x + 13;");
        loop {
            if lexer.next_token().kind == TokenKind::Eoi {
                break;
            }
        }

        assert_eq!(2, lexer.symbols().len());
        assert!(lexer.symbols().lookup("", "x").is_some());
        assert!(lexer.symbols().lookup("", "13").is_some());
    }

    #[test]
    fn test_token_carries_interned_name() {
        let mut lexer = Lexer::decaf("count");
        let token = lexer.next_token();
        assert_eq!(Some("count".to_string()), token.entry);

        let mut lexer = Lexer::decaf(";");
        assert_eq!(None, lexer.next_token().entry);
    }
}
