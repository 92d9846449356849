//! Pattern escaping and pattern-shape recognition for Loopback's
//! `like`/`nlike`/`regex` operators.
//!
//! The string operators (`begins_with`, `contains`, `ends_with` and their
//! negations) are encoded as patterns. Literal text is escaped so that it
//! matches verbatim, and on the way back the shape of the pattern tells which
//! operator produced it.

use rulefilter_core::operator::AbstractOperator;


/// Escapes and restores regular-expression metacharacters in literal text.
pub(crate) struct PatternEscaper;

impl PatternEscaper {
    /// Characters prefixed with a backslash when embedding a literal.
    const METACHARACTERS: [char; 16] = [
        '-', '[', ']', '/', '{', '}', '(', ')', '*', '+', '?', '.', '\\', '^', '$', '|',
    ];

    /// Prefixes every metacharacter in `input` with a backslash.
    pub(crate) fn escape(input: &str) -> String {
        let mut escaped = String::with_capacity(input.len());
        for c in input.chars() {
            if Self::METACHARACTERS.contains(&c) {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }

    /// Removes the backslashes `escape` added. Other escapes are kept as is.
    pub(crate) fn unescape(input: &str) -> String {
        let mut restored = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            match chars.peek() {
                Some(next) if c == '\\' && Self::METACHARACTERS.contains(next) => {
                    restored.push(*next);
                    chars.next();
                }
                _ => restored.push(c),
            }
        }
        restored
    }

    /// Returns `true` when `input` ends with a `$` that is not escaped.
    fn ends_with_anchor(input: &str) -> bool {
        input.strip_suffix('$').is_some_and(|rest| {
            rest.chars().rev().take_while(|c| *c == '\\').count() % 2 == 0
        })
    }
}

/// A pattern wrapped in a fixed prefix and suffix, mapped to the operator
/// that produces it.
struct RegexShape {
    prefix: &'static str,
    suffix: &'static str,
    operator: AbstractOperator,
}

impl RegexShape {
    const fn new(prefix: &'static str, suffix: &'static str, operator: AbstractOperator) -> Self {
        Self { prefix, suffix, operator }
    }

    fn strip<'a>(&self, source: &'a str) -> Option<&'a str> {
        if !source.starts_with(self.prefix) || !source.ends_with(self.suffix) {
            return None;
        }
        let end = source.len().saturating_sub(self.suffix.len());
        Some(source.get(self.prefix.len()..end).unwrap_or(""))
    }
}

/// Shapes of `regex` sources, tested top to bottom. The negated shapes come
/// first; the generic suffix, prefix and catch-all shapes would otherwise
/// claim them.
const REGEX_SHAPES: [RegexShape; 6] = [
    RegexShape::new("^(?!", ")", AbstractOperator::NotBeginsWith),
    RegexShape::new("^((?!", ").)*$", AbstractOperator::NotContains),
    RegexShape::new("(?<!", ")$", AbstractOperator::NotEndsWith),
    RegexShape::new("", "$", AbstractOperator::EndsWith),
    RegexShape::new("^", "", AbstractOperator::BeginsWith),
    RegexShape::new("", "", AbstractOperator::Contains),
];

/// Classifies a `regex` source, returning the operator and the literal text
/// between the shape's prefix and suffix.
pub(crate) fn classify_regex(source: &str) -> (AbstractOperator, &str) {
    REGEX_SHAPES
        .iter()
        .find_map(|shape| shape.strip(source).map(|literal| (shape.operator, literal)))
        .unwrap_or((AbstractOperator::Contains, source))
}

/// Where a `like`/`nlike` pattern is anchored.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    End,
    Start,
    Unanchored,
}

impl Anchor {
    fn strip(self, pattern: &str) -> Option<&str> {
        match self {
            Anchor::End if PatternEscaper::ends_with_anchor(pattern) => {
                pattern.strip_suffix('$')
            }
            Anchor::Start => pattern.strip_prefix('^'),
            Anchor::Unanchored => Some(pattern),
            Anchor::End => None,
        }
    }
}

/// Anchors of `like`/`nlike` patterns, tested top to bottom, with the
/// positive and negated operator each one maps to.
const LIKE_SHAPES: [(Anchor, AbstractOperator, AbstractOperator); 3] = [
    (Anchor::End, AbstractOperator::EndsWith, AbstractOperator::NotEndsWith),
    (Anchor::Start, AbstractOperator::BeginsWith, AbstractOperator::NotBeginsWith),
    (Anchor::Unanchored, AbstractOperator::Contains, AbstractOperator::NotContains),
];

/// Classifies a `like` (or, with `negated`, an `nlike`) pattern, returning
/// the operator and the unescaped literal.
pub(crate) fn classify_like(pattern: &str, negated: bool) -> (AbstractOperator, String) {
    LIKE_SHAPES
        .iter()
        .find_map(|(anchor, positive, negative)| {
            anchor.strip(pattern).map(|literal| {
                let operator = if negated { *negative } else { *positive };
                (operator, PatternEscaper::unescape(literal))
            })
        })
        .unwrap_or_else(|| {
            let operator = if negated { AbstractOperator::NotContains } else { AbstractOperator::Contains };
            (operator, PatternEscaper::unescape(pattern))
        })
}
