//! Glob patterns over dotted metric names.
//!
//! | Syntax | Matches |
//! |--------|---------|
//! | `*` | any run of characters within one segment |
//! | `?` | exactly one character within one segment |
//! | `[abc]`, `[a-z]` | one character from the class |
//! | `[!abc]`, `[^abc]` | one character outside the class (never `.`) |
//! | `{cpu,mem}` | any alternative; may nest, may not contain `.` |
//! | `\x` | the literal character `x` |
//!
//! Wildcards never cross a `.`, so a pattern always matches names with exactly
//! [`GlobPattern::depth`] segments.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use regex::Regex;

use crate::error::{Error, Result};
use crate::path::TOKEN_DELIMITER;

/// A compiled, anchored glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
    depth: usize,
    literal: bool,
}

impl GlobPattern {
    /// Parses and compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedQuery` for an empty pattern, an empty segment,
    /// unbalanced `{}` or `[]`, a `.` inside a brace or class, or a trailing `\`.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::MalformedQuery("empty query".to_string()));
        }

        let mut out = String::with_capacity(pattern.len() * 2 + 2);
        out.push('^');
        let mut chars = pattern.chars().peekable();
        let mut brace_depth = 0usize;
        let mut segment_len = 0usize;
        let mut depth = 1usize;
        let mut literal = true;

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    let escaped = chars
                        .next()
                        .ok_or_else(|| malformed(pattern, "trailing '\\'"))?;
                    if escaped == TOKEN_DELIMITER {
                        return Err(malformed(pattern, "escaped '.' would span segments"));
                    }
                    push_literal(&mut out, escaped);
                    literal = false;
                }
                '*' => {
                    out.push_str("[^.]*");
                    literal = false;
                }
                '?' => {
                    out.push_str("[^.]");
                    literal = false;
                }
                '{' => {
                    brace_depth += 1;
                    out.push_str("(?:");
                    literal = false;
                }
                '}' => {
                    if brace_depth == 0 {
                        return Err(malformed(pattern, "unmatched '}'"));
                    }
                    brace_depth -= 1;
                    out.push(')');
                }
                ',' if brace_depth > 0 => out.push('|'),
                '[' => {
                    push_class(&mut out, &mut chars, pattern)?;
                    literal = false;
                }
                TOKEN_DELIMITER => {
                    if brace_depth > 0 {
                        return Err(malformed(pattern, "alternation may not span segments"));
                    }
                    if segment_len == 0 {
                        return Err(malformed(pattern, "empty segment"));
                    }
                    out.push_str(r"\.");
                    depth += 1;
                    segment_len = 0;
                    continue;
                }
                other => push_literal(&mut out, other),
            }
            segment_len += 1;
        }

        if brace_depth > 0 {
            return Err(malformed(pattern, "unclosed '{'"));
        }
        if segment_len == 0 {
            return Err(malformed(pattern, "empty segment"));
        }
        out.push('$');

        let regex = Regex::new(&out).map_err(|e| malformed(pattern, &e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            depth,
            literal,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of segments every match has.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True if the pattern contains no metacharacters and matches only itself.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Tests a full metric name or path.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        if self.literal {
            return candidate == self.source;
        }
        self.regex.is_match(candidate)
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn malformed(pattern: &str, reason: &str) -> Error {
    Error::MalformedQuery(format!("{reason} in '{pattern}'"))
}

fn push_literal(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}

/// Translates a `[...]` class; the opening bracket is already consumed.
fn push_class(out: &mut String, chars: &mut Peekable<Chars<'_>>, pattern: &str) -> Result<()> {
    out.push('[');
    let negated = matches!(chars.peek(), Some('!' | '^'));
    if negated {
        chars.next();
        out.push('^');
    }

    let mut empty = true;
    loop {
        let ch = chars
            .next()
            .ok_or_else(|| malformed(pattern, "unclosed '['"))?;
        match ch {
            // A leading ']' is a member, not the terminator
            ']' if !empty => break,
            TOKEN_DELIMITER => {
                return Err(malformed(pattern, "character class may not contain '.'"));
            }
            '-' if !empty && chars.peek() != Some(&']') => out.push('-'),
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| malformed(pattern, "trailing '\\'"))?;
                if escaped == TOKEN_DELIMITER {
                    return Err(malformed(pattern, "character class may not contain '.'"));
                }
                push_literal(out, escaped);
            }
            other => push_literal(out, other),
        }
        empty = false;
    }

    // Ranges such as `[--/]` would otherwise admit the delimiter
    if negated {
        out.push_str(r"\.");
    } else {
        out.push_str("&&[^.]");
    }
    out.push(']');
    Ok(())
}
