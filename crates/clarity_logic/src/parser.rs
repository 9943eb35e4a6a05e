//! Structured parser for formal expressions.
//!
//! Accepts both the Unicode notation and the ASCII spellings extraction
//! models tend to produce:
//!
//! | operator | spellings |
//! |---|---|
//! | negation | `¬` `~` `!` `NOT` |
//! | conjunction | `∧` `&` `&&` `AND` |
//! | disjunction | `∨` `\|` `\|\|` `OR` |
//! | implication | `→` `->` `=>` `⇒` `>>` |
//! | biconditional | `↔` `<->` `<=>` `⇔` `IFF` |
//! | constants | `⊤` `true` `⊥` `false` |
//! | comparison | `>` `<` `=` `==` `≥` `>=` `≤` `<=` `≠` `!=` |
//! | membership | `∈` `∉` |
//!
//! Precedence from loosest to tightest: `↔`, `→` (right-associative), `∨`,
//! `∧`, `¬`, then comparisons and membership. Anything else is a
//! [`Error::Parse`] and sends the compiler to its pattern-matching fallback.

use crate::error::{Error, Result};
use crate::formula::{CmpOp, Formula};

/// Formula trees taller than this are rejected, and so is parser recursion
/// deeper than this.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
    Comma,
    Cmp(CmpOp),
    NotEq,
    In,
    NotIn,
    Const(bool),
    Ident(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("'{}'", name),
            Token::Cmp(op) => format!("'{}'", op.symbol()),
            other => format!("{:?}", other),
        }
    }
}

/// Parses a formal expression into a [`Formula`].
pub fn parse(input: &str) -> Result<Formula> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(Error::parse(0, "empty expression"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
    };
    let node = parser.parse_iff()?;
    match parser.peek() {
        None => Ok(node.formula),
        Some(tok) => Err(Error::parse(
            parser.offset(),
            format!("unexpected {}", tok.describe()),
        )),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '\''
}

fn keyword(word: &str) -> Option<Token> {
    match word {
        "NOT" | "not" => Some(Token::Not),
        "AND" | "and" => Some(Token::And),
        "OR" | "or" => Some(Token::Or),
        "IFF" | "iff" => Some(Token::Iff),
        "true" | "TRUE" => Some(Token::Const(true)),
        "false" | "FALSE" => Some(Token::Const(false)),
        _ => None,
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let at = |i: usize| chars.get(i).map(|(_, c)| *c);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let (token, width) = match c {
            '¬' | '~' => (Token::Not, 1),
            '!' if at(i + 1) == Some('=') => (Token::NotEq, 2),
            '!' => (Token::Not, 1),
            '∧' => (Token::And, 1),
            '&' if at(i + 1) == Some('&') => (Token::And, 2),
            '&' => (Token::And, 1),
            '∨' => (Token::Or, 1),
            '|' if at(i + 1) == Some('|') => (Token::Or, 2),
            '|' => (Token::Or, 1),
            '→' | '⇒' => (Token::Implies, 1),
            '↔' | '⇔' => (Token::Iff, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            ',' => (Token::Comma, 1),
            '≥' => (Token::Cmp(CmpOp::Ge), 1),
            '≤' => (Token::Cmp(CmpOp::Le), 1),
            '≠' => (Token::NotEq, 1),
            '∈' => (Token::In, 1),
            '∉' => (Token::NotIn, 1),
            '⊤' => (Token::Const(true), 1),
            '⊥' => (Token::Const(false), 1),
            '-' if at(i + 1) == Some('>') => (Token::Implies, 2),
            '=' if at(i + 1) == Some('>') => (Token::Implies, 2),
            '=' if at(i + 1) == Some('=') => (Token::Cmp(CmpOp::Eq), 2),
            '=' => (Token::Cmp(CmpOp::Eq), 1),
            '>' if at(i + 1) == Some('>') => (Token::Implies, 2),
            '>' if at(i + 1) == Some('=') => (Token::Cmp(CmpOp::Ge), 2),
            '>' => (Token::Cmp(CmpOp::Gt), 1),
            '<' if matches!((at(i + 1), at(i + 2)), (Some('-'), Some('>')) | (Some('='), Some('>'))) => {
                (Token::Iff, 3)
            }
            '<' if at(i + 1) == Some('=') => (Token::Cmp(CmpOp::Le), 2),
            '<' => (Token::Cmp(CmpOp::Lt), 1),
            c if is_ident_char(c) => {
                let start = i;
                while i < chars.len() && is_ident_char(chars[i].1) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                tokens.push((offset, keyword(&word).unwrap_or(Token::Ident(word))));
                continue;
            }
            other => {
                return Err(Error::parse(offset, format!("unexpected character '{}'", other)));
            }
        };

        tokens.push((offset, token));
        i += width;
    }

    Ok(tokens)
}

/// A parsed subtree and its height, a leaf being 1.
struct Node {
    formula: Formula,
    height: usize,
}

impl Node {
    fn leaf(formula: Formula) -> Self {
        Self { formula, height: 1 }
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(o, _)| *o)
            .unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(Error::parse(self.offset(), format!("expected {}", what)))
        }
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::parse(self.offset(), "expression nested too deeply"));
        }
        Ok(())
    }

    /// Builds a binary connective, rejecting trees taller than `MAX_DEPTH`.
    ///
    /// Operator chains are parsed in a loop, so the recursion guard in
    /// `descend` never sees them; the height check bounds them instead.
    fn join(&self, left: Node, right: Node, build: fn(Formula, Formula) -> Formula) -> Result<Node> {
        let height = left.height.max(right.height) + 1;
        if height > MAX_DEPTH {
            return Err(Error::parse(self.offset(), "expression nested too deeply"));
        }
        Ok(Node {
            formula: build(left.formula, right.formula),
            height,
        })
    }

    fn negate(&self, inner: Node) -> Result<Node> {
        let height = inner.height + 1;
        if height > MAX_DEPTH {
            return Err(Error::parse(self.offset(), "expression nested too deeply"));
        }
        Ok(Node {
            formula: Formula::not(inner.formula),
            height,
        })
    }

    fn parse_iff(&mut self) -> Result<Node> {
        let mut left = self.parse_implies()?;
        while self.eat(&Token::Iff) {
            let right = self.parse_implies()?;
            left = self.join(left, right, Formula::iff)?;
        }
        Ok(left)
    }

    fn parse_implies(&mut self) -> Result<Node> {
        let left = self.parse_or()?;
        if self.eat(&Token::Implies) {
            self.descend()?;
            let right = self.parse_implies()?;
            self.depth -= 1;
            return self.join(left, right, Formula::implies);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Node> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = self.join(left, right, Formula::or)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node> {
        let mut left = self.parse_unary()?;
        while self.eat(&Token::And) {
            let right = self.parse_unary()?;
            left = self.join(left, right, Formula::and)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return self.negate(inner);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node> {
        let offset = self.offset();
        match self.next() {
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_iff()?;
                self.depth -= 1;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Const(value)) => Ok(Node::leaf(Formula::Const(value))),
            Some(Token::Ident(name)) => {
                let args = self.parse_args()?;
                self.parse_relation(name, args)
            }
            Some(other) => Err(Error::parse(
                offset,
                format!("expected expression, found {}", other.describe()),
            )),
            None => Err(Error::parse(offset, "unexpected end of expression")),
        }
    }

    /// Argument list after a predicate name, if one follows.
    fn parse_args(&mut self) -> Result<Option<Vec<String>>> {
        if !self.eat(&Token::LParen) {
            return Ok(None);
        }
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(Some(args));
        }
        loop {
            args.push(self.parse_term()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "',' or ')'")?;
            return Ok(Some(args));
        }
    }

    /// A term: a name, optionally applied to nested terms.
    fn parse_term(&mut self) -> Result<String> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Ident(name)) => {
                self.descend()?;
                let args = self.parse_args()?;
                self.depth -= 1;
                Ok(match args {
                    Some(args) => format!("{}({})", name, args.join(", ")),
                    None => name,
                })
            }
            Some(other) => Err(Error::parse(
                offset,
                format!("expected term, found {}", other.describe()),
            )),
            None => Err(Error::parse(offset, "expected term")),
        }
    }

    fn parse_relation(&mut self, name: String, args: Option<Vec<String>>) -> Result<Node> {
        let left = || match &args {
            Some(a) => format!("{}({})", name, a.join(", ")),
            None => name.clone(),
        };
        match self.peek() {
            Some(Token::Cmp(op)) => {
                let op = *op;
                self.pos += 1;
                Ok(Node::leaf(Formula::Comparison {
                    left: left(),
                    op,
                    right: self.parse_term()?,
                }))
            }
            Some(Token::NotEq) => {
                self.pos += 1;
                let equality = Node::leaf(Formula::Comparison {
                    left: left(),
                    op: CmpOp::Eq,
                    right: self.parse_term()?,
                });
                self.negate(equality)
            }
            Some(Token::In) | Some(Token::NotIn) => {
                let negated = self.peek() == Some(&Token::NotIn);
                self.pos += 1;
                let membership = Node::leaf(Formula::Membership {
                    element: left(),
                    set: self.parse_term()?,
                });
                if negated {
                    self.negate(membership)
                } else {
                    Ok(membership)
                }
            }
            _ => Ok(Node::leaf(match args {
                Some(args) => Formula::Predicate { name, args },
                None => Formula::Atom(name),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    #[test]
    fn test_atoms_and_connectives() {
        assert_eq!(p("p"), "p");
        assert_eq!(p("¬p"), "¬p");
        assert_eq!(p("p ∧ q ∨ r"), "((p ∧ q) ∨ r)");
        assert_eq!(p("p ∨ q ∧ r"), "(p ∨ (q ∧ r))");
    }

    #[test]
    fn test_implication_is_right_associative() {
        assert_eq!(p("a → b → c"), "(a → (b → c))");
        assert_eq!(p("a ↔ b → c"), "(a ↔ (b → c))");
    }

    #[test]
    fn test_ascii_spellings() {
        assert_eq!(p("~p & q"), p("¬p ∧ q"));
        assert_eq!(p("p && q || r"), p("p ∧ q ∨ r"));
        assert_eq!(p("p -> q"), p("p → q"));
        assert_eq!(p("p => q"), p("p → q"));
        assert_eq!(p("p >> q"), p("p → q"));
        assert_eq!(p("p <-> q"), p("p ↔ q"));
        assert_eq!(p("p <=> q"), p("p ↔ q"));
        assert_eq!(p("NOT p AND q OR r"), p("¬p ∧ q ∨ r"));
        assert_eq!(p("p iff q"), p("p ↔ q"));
        assert_eq!(p("!p"), "¬p");
    }

    #[test]
    fn test_constants() {
        assert_eq!(parse("⊤").unwrap(), Formula::Const(true));
        assert_eq!(parse("p ∧ false").unwrap(), Formula::and(Formula::atom("p"), Formula::Const(false)));
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            parse("likes(me, cow_milk)").unwrap(),
            Formula::Predicate {
                name: "likes".into(),
                args: vec!["me".into(), "cow_milk".into()],
            }
        );
        assert_eq!(p("owns(a, parent(b))"), "owns(a, parent(b))");
        assert_eq!(p("ready()"), "ready()");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(p("x > 3"), "x > 3");
        assert_eq!(p("x >= 3"), "x ≥ 3");
        assert_eq!(p("x <= 3"), "x ≤ 3");
        assert_eq!(p("x == y"), "x = y");
        assert_eq!(p("x != y"), "¬x = y");
        assert_eq!(p("x ≠ y"), p("x != y"));
        assert_eq!(p("cost(plan) > budget ∧ approved"), "(cost(plan) > budget ∧ approved)");
    }

    #[test]
    fn test_membership() {
        assert_eq!(p("milk ∈ cow_products"), "milk ∈ cow_products");
        assert_eq!(p("milk ∉ cow_products"), "¬milk ∈ cow_products");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(p("¬(p ∧ q)"), "¬(p ∧ q)");
        assert_eq!(p("(p → q) ∧ p"), "((p → q) ∧ p)");
    }

    #[test]
    fn test_rejects_unbalanced_parentheses() {
        assert!(matches!(parse("(p ∧ q"), Err(Error::Parse { .. })));
        // positions are byte offsets
        assert!(matches!(parse("p & q)"), Err(Error::Parse { position: 5, .. })));
    }

    #[test]
    fn test_rejects_quantifiers_and_arithmetic() {
        assert!(parse("∀x P(x)").is_err());
        assert!(parse("x + y > 3").is_err());
        assert!(parse("p ∧").is_err());
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_rejects_excessive_nesting() {
        let deep = format!("{}p{}", "(".repeat(400), ")".repeat(400));
        assert!(parse(&deep).is_err());
        let shallow = format!("{}p{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(p(&shallow), "p");
    }

    fn chain(op: &str, terms: usize) -> String {
        (0..terms)
            .map(|i| format!("a{}", i))
            .collect::<Vec<_>>()
            .join(op)
    }

    #[test]
    fn test_rejects_long_operator_chains() {
        for op in [" ∧ ", " ∨ ", " ↔ "] {
            assert!(matches!(
                parse(&chain(op, 5000)),
                Err(Error::Parse { .. })
            ));
        }
        assert!(parse(&chain(" ∧ ", 200)).is_ok());
    }

    #[test]
    fn test_chain_height_adds_to_nesting() {
        // 200 conjuncts under 100 negations is 300 levels tall
        let tall = format!("{}({})", "¬".repeat(100), chain(" ∧ ", 200));
        assert!(parse(&tall).is_err());
        let short = format!("{}({})", "¬".repeat(10), chain(" ∧ ", 200));
        assert!(parse(&short).is_ok());
    }
}
