//! Lexer rule sets.
//!
//! A rule set is a list of `(pattern, token code)` pairs compiled into one
//! merged NFA. Rule order is priority order: acceptance ties during scanning
//! go to the earliest rule. Rule files carry one pair per line; the literal
//! patterns `whitespace`, `comments` and `unclosed` invoke builtin recipes
//! that cannot be written as plain patterns.

use std::{fs, path::Path};

use once_cell::sync::Lazy;

use crate::regex::{self, Accept, Item, Nfa, Op, PatternError};

use super::token::TokenKind;

/// Token code of skipped whitespace lexemes.
pub const WHITESPACE: i32 = -2;
/// Token code of skipped comment lexemes.
pub const COMMENT: i32 = -3;

static DECAF: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::from_rules(&decaf_rules()).expect("the builtin Decaf rule set must compile")
});

/// A compiled set of lexer rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    nfa: Nfa,
}

impl RuleSet {
    /// The builtin rule set of the Decaf source language.
    pub fn decaf() -> &'static RuleSet {
        &DECAF
    }

    /// Compile `(pattern, code)` pairs in priority order.
    pub fn from_rules(rules: &[(String, i32)]) -> Result<RuleSet, PatternError> {
        let mut nfa = Nfa::new();

        for (pattern, code) in rules {
            match pattern.as_str() {
                "whitespace" => add_pattern(&mut nfa, "(\n|\t|\r| )", *code)?,
                "comments" => add_recipe(&mut nfa, comment_items(true), Accept::non_greedy(*code))?,
                "unclosed" => add_recipe(&mut nfa, comment_items(false), Accept::greedy(*code))?,
                _ => add_pattern(&mut nfa, pattern, *code)?,
            }
        }

        Ok(RuleSet { nfa })
    }

    /// Parse the textual rule-file format: one `pattern code` pair per line,
    /// split at the last whitespace. Blank lines are ignored.
    pub fn parse(text: &str) -> Result<RuleSet, PatternError> {
        let mut rules = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((pattern, code)) = line.rsplit_once(char::is_whitespace) else {
                return Err(PatternError::new(format!(
                    "rule line without a token code: '{line}'"
                )));
            };
            let code = code.parse::<i32>().map_err(|_| {
                PatternError::new(format!("invalid token code in rule line: '{line}'"))
            })?;
            rules.push((pattern.trim_end().to_string(), code));
        }

        RuleSet::from_rules(&rules)
    }

    /// Load a rule file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<RuleSet> {
        let text = fs::read_to_string(path)?;
        Ok(RuleSet::parse(&text)?)
    }

    pub(crate) fn nfa(&self) -> &Nfa {
        &self.nfa
    }
}

fn add_pattern(nfa: &mut Nfa, pattern: &str, code: i32) -> Result<(), PatternError> {
    nfa.add_rule(&regex::to_postfix(pattern)?, Accept::greedy(code))
}

fn add_recipe(nfa: &mut Nfa, items: Vec<Item>, accept: Accept) -> Result<(), PatternError> {
    nfa.add_rule(&regex::shunt(regex::insert_concatenation(items))?, accept)
}

/// `(c9|c10|…|c126)`: any character a comment body may contain.
fn comment_body() -> Vec<Item> {
    let mut items = vec![Item::Op(Op::LParen)];
    for symbol in 9u8..=126 {
        if symbol != 9 {
            items.push(Item::Op(Op::Union));
        }
        items.push(Item::Literal(symbol));
    }
    items.push(Item::Op(Op::RParen));
    items
}

/// `/* body* */` when closed, `/* body*` (to end of input) when not. The
/// closed variant is scanned non-greedily so the first `*/` terminates it.
fn comment_items(closed: bool) -> Vec<Item> {
    let mut items = vec![Item::Literal(b'/'), Item::Literal(b'*')];
    items.extend(comment_body());
    items.push(Item::Op(Op::Star));
    if closed {
        items.push(Item::Literal(b'*'));
        items.push(Item::Literal(b'/'));
    }
    items
}

fn letter_pattern() -> String {
    let mut letter = String::from("(a");
    for c in b'b'..=b'z' {
        letter.push('|');
        letter.push(c as char);
    }
    for c in b'A'..=b'Z' {
        letter.push('|');
        letter.push(c as char);
    }
    letter.push_str("|_)");
    letter
}

fn digit_pattern() -> String {
    String::from("(0|1|2|3|4|5|6|7|8|9)")
}

fn identifier_pattern() -> String {
    let letter = letter_pattern();
    let digit = digit_pattern();
    format!("{letter}({letter}|{digit})*")
}

fn number_pattern() -> String {
    let digits = format!("{}+", digit_pattern());
    let fraction = format!("(\\.{digits})?");
    let exponent = format!("(E(\\+|-)?{digits})?");
    format!("{digits}{fraction}{exponent}")
}

/// The builtin Decaf rule table: keywords, punctuation and operators before
/// the identifier and number categories, trivia last. `comments` must come
/// before `unclosed` so a closed comment wins their acceptance tie.
fn decaf_rules() -> Vec<(String, i32)> {
    let fixed: &[(&str, TokenKind)] = &[
        ("class", TokenKind::Class),
        ("static", TokenKind::Static),
        ("void", TokenKind::Void),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("for", TokenKind::For),
        ("return", TokenKind::Return),
        ("break", TokenKind::Break),
        ("continue", TokenKind::Continue),
        ("int", TokenKind::Int),
        ("real", TokenKind::Real),
        ("{", TokenKind::LBrace),
        ("}", TokenKind::RBrace),
        ("\\(", TokenKind::LParen),
        ("\\)", TokenKind::RParen),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        (",", TokenKind::Comma),
        (";", TokenKind::Semicolon),
        ("==", TokenKind::Eq),
        ("!=", TokenKind::Neq),
        ("<=", TokenKind::Le),
        (">=", TokenKind::Ge),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        ("=", TokenKind::Assign),
        ("\\+\\+", TokenKind::Increment),
        ("--", TokenKind::Decrement),
        ("\\+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("\\*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Percent),
        ("&&", TokenKind::And),
        ("\\|\\|", TokenKind::Or),
        ("!", TokenKind::Not),
    ];

    let mut rules: Vec<(String, i32)> = fixed
        .iter()
        .map(|(pattern, kind)| (pattern.to_string(), kind.code()))
        .collect();
    rules.push((identifier_pattern(), TokenKind::Identifier.code()));
    rules.push((number_pattern(), TokenKind::Number.code()));
    rules.push(("whitespace".to_string(), WHITESPACE));
    rules.push(("comments".to_string(), COMMENT));
    rules.push(("unclosed".to_string(), TokenKind::Unknown.code()));
    rules
}
