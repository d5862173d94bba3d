//! Cell text analysis: delimiter balance, comment stripping, form splitting
//! and form classification.
//!
//! Everything here is pure string work. The splitter is the only part that
//! needs real parsing; it recognizes top-level balanced-parenthesis groups
//! with nom, treating string literals as opaque so quoted parentheses never
//! unbalance a form.

use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::{anychar, char},
    combinator::recognize,
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

use crate::vocabulary::CONSTRUCT_KEYWORDS;

// ============================================================================
// Balance checking
// ============================================================================

/// True when every non-quoted parenthesis in `text` is matched.
///
/// Parentheses inside double-quoted strings are ignored; a backslash escapes
/// the next character inside a string. Depth going negative means an
/// unmatched closing parenthesis and fails immediately. An unterminated
/// string simply suppresses counting to the end of input, which leaves the
/// caller asking for more input until the quote closes.
pub fn balanced(text: &str) -> bool {
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0
}

// ============================================================================
// Comment stripping
// ============================================================================

/// Remove `;` line comments, leaving quoted text untouched.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut in_comment = false;

    for c in text.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            }
            continue;
        }
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            ';' => in_comment = true,
            '"' => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

// ============================================================================
// Form splitting
// ============================================================================

fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        many0(alt((
            recognize(preceded(char('\\'), anychar)),
            is_not("\"\\"),
        ))),
        char('"'),
    ))(input)
}

fn balanced_group(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('('),
        many0(alt((string_literal, is_not("()\""), balanced_group))),
        char(')'),
    ))(input)
}

/// Split comment-stripped text into its ordered top-level forms.
///
/// A form is one maximal balanced-parenthesis group; nested groups stay part
/// of their enclosing form. Text between forms is discarded. Empty input
/// yields no forms.
pub fn split_forms(text: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let mut rest = text;

    while let Some(idx) = rest.find('(') {
        match balanced_group(&rest[idx..]) {
            Ok((remaining, form)) => {
                forms.push(form.trim().to_string());
                rest = remaining;
            }
            // unmatched tail, nothing further to yield
            Err(_) => break,
        }
    }

    forms
}

// ============================================================================
// Classification
// ============================================================================

/// How a form is submitted to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// A construct definition, compiled with `build`.
    Construct,
    /// An expression, evaluated with `eval`.
    Expression,
}

/// Classify a form by its leading keyword.
pub fn classify(form: &str) -> FormKind {
    let keyword = form
        .trim()
        .trim_matches(|c| c == '(' || c == ')')
        .split_whitespace()
        .next()
        .unwrap_or_default();

    if CONSTRUCT_KEYWORDS.contains(&keyword) {
        FormKind::Construct
    } else {
        FormKind::Expression
    }
}

// ============================================================================
// Tests
// ============================================================================
