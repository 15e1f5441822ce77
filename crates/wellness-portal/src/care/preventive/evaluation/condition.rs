//! Structured parsing of rule eligibility expressions.
//!
//! An expression is a list of clauses joined by `AND` (or `&&`). Each clause is
//! either an age comparison (`age >= 50`) or a sex equality test
//! (`sex === "female"`). Clauses are parsed independently so one unreadable
//! clause does not discard the constraints that were understood.

use logos::Logos;
use serde::Serialize;

use super::super::domain::Sex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Less,
    Equal,
}

impl Comparison {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">=" => Some(Comparison::GreaterOrEqual),
            "<=" => Some(Comparison::LessOrEqual),
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            "=" | "==" | "===" => Some(Comparison::Equal),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::Equal => "=",
        }
    }

    pub fn holds(self, actual: u32, threshold: u32) -> bool {
        match self {
            Comparison::GreaterOrEqual => actual >= threshold,
            Comparison::LessOrEqual => actual <= threshold,
            Comparison::Greater => actual > threshold,
            Comparison::Less => actual < threshold,
            Comparison::Equal => actual == threshold,
        }
    }
}

/// Eligibility condition tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Condition {
    /// Matches every patient.
    Unconstrained,
    AgeComparison {
        op: Comparison,
        value: u32,
    },
    /// Lowercased; a value that is not a known sex never matches.
    SexEquals {
        value: String,
    },
    Conjunction {
        left: Box<Condition>,
        right: Box<Condition>,
    },
}

impl Condition {
    pub fn matches(&self, age: u32, sex: Sex) -> bool {
        match self {
            Condition::Unconstrained => true,
            Condition::AgeComparison { op, value } => op.holds(age, *value),
            Condition::SexEquals { value } => value == sex.label(),
            Condition::Conjunction { left, right } => {
                left.matches(age, sex) && right.matches(age, sex)
            }
        }
    }

    fn and(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::Unconstrained, other) => other,
            (current, Condition::Unconstrained) => current,
            (left, right) => Condition::Conjunction {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }
}

/// Reasons a clause could not be turned into a constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionParseError {
    #[error("condition expression has no clauses")]
    Empty,
    #[error("unexpected character '{found}' in clause '{clause}'")]
    UnexpectedCharacter { clause: String, found: char },
    #[error("clause '{clause}' is not of the form <field> <operator> <value>")]
    Malformed { clause: String },
    #[error("clause '{clause}' references unsupported field '{field}'")]
    UnsupportedField { clause: String, field: String },
    #[error("clause '{clause}' uses operator '{operator}' which {field} does not support")]
    UnsupportedOperator {
        clause: String,
        field: String,
        operator: String,
    },
    #[error("age threshold in clause '{clause}' is not a whole number of years")]
    InvalidAge { clause: String },
}

/// Result of parsing an expression: the understood constraints plus every
/// clause that had to be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCondition {
    pub condition: Condition,
    pub rejected: Vec<ConditionParseError>,
}

impl ParsedCondition {
    pub fn is_ambiguous(&self) -> bool {
        !self.rejected.is_empty()
    }
}

pub fn parse_condition(expression: &str) -> ParsedCondition {
    let tokens = tokenize(expression);
    let mut condition = Condition::Unconstrained;
    let mut rejected = Vec::new();

    let clauses: Vec<&[Token]> = tokens
        .split(|token| token.lexeme == Ok(Lexeme::And))
        .collect();

    if tokens.is_empty() {
        rejected.push(ConditionParseError::Empty);
    } else {
        for clause in clauses {
            match parse_clause(expression, clause) {
                Ok(parsed) => condition = condition.and(parsed),
                Err(error) => rejected.push(error),
            }
        }
    }

    ParsedCondition {
        condition,
        rejected,
    }
}

fn parse_clause(source: &str, tokens: &[Token]) -> Result<Condition, ConditionParseError> {
    let clause = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => source
            .get(first.start..last.end)
            .unwrap_or_default()
            .trim()
            .to_string(),
        _ => {
            return Err(ConditionParseError::Malformed {
                clause: String::new(),
            })
        }
    };

    let mut lexemes = Vec::with_capacity(tokens.len());
    for token in tokens {
        match &token.lexeme {
            Err(found) => {
                return Err(ConditionParseError::UnexpectedCharacter {
                    clause,
                    found: *found,
                })
            }
            Ok(Lexeme::UnterminatedText) => return Err(ConditionParseError::Malformed { clause }),
            Ok(lexeme) => lexemes.push(lexeme),
        }
    }

    let [Lexeme::Ident(field), Lexeme::Operator(operator), value] = lexemes.as_slice() else {
        return Err(ConditionParseError::Malformed { clause });
    };

    let comparison =
        Comparison::from_symbol(operator).ok_or_else(|| ConditionParseError::UnsupportedOperator {
            clause: clause.clone(),
            field: field.clone(),
            operator: operator.clone(),
        })?;

    match field.as_str() {
        "age" => {
            let Lexeme::Number(raw) = value else {
                return Err(ConditionParseError::Malformed { clause });
            };
            let threshold = raw
                .parse::<u32>()
                .map_err(|_| ConditionParseError::InvalidAge { clause })?;
            Ok(Condition::AgeComparison {
                op: comparison,
                value: threshold,
            })
        }
        "sex" => {
            if comparison != Comparison::Equal {
                return Err(ConditionParseError::UnsupportedOperator {
                    clause,
                    field: field.clone(),
                    operator: operator.clone(),
                });
            }
            match value {
                Lexeme::Text(text) | Lexeme::Ident(text) => Ok(Condition::SexEquals {
                    value: text.trim().to_ascii_lowercase(),
                }),
                _ => Err(ConditionParseError::Malformed { clause }),
            }
        }
        other => Err(ConditionParseError::UnsupportedField {
            clause,
            field: other.to_string(),
        }),
    }
}

/// Lexemes of a condition expression. Keywords and field names are
/// case-insensitive; identifiers are lowercased.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[token("and", ignore(ascii_case))]
    #[token("&&")]
    And,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_ascii_lowercase())]
    Ident(String),
    #[regex(r"[0-9][0-9.]*", |lex| lex.slice().to_string())]
    Number(String),
    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'[^']*'", |lex| unquote(lex.slice()))]
    Text(String),
    #[regex(r#""[^"]*"#)]
    #[regex(r"'[^']*")]
    UnterminatedText,
    #[regex(r"[<>=!]+", |lex| lex.slice().to_string())]
    Operator(String),
}

fn unquote(quoted: &str) -> String {
    quoted
        .get(1..quoted.len().saturating_sub(1))
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    /// `Err` carries the first character the lexer could not place.
    lexeme: Result<Lexeme, char>,
    start: usize,
    end: usize,
}

fn tokenize(source: &str) -> Vec<Token> {
    Lexeme::lexer(source)
        .spanned()
        .map(|(lexeme, span)| Token {
            lexeme: lexeme.map_err(|()| {
                source
                    .get(span.start..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or_default()
            }),
            start: span.start,
            end: span.end,
        })
        .collect()
}
