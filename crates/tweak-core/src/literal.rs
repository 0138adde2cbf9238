//! Splitting a literal's text into its numeric body and unit suffix.

/// The textual style of a numeric literal as it appears in source.
///
/// `numeric` is everything up to and including the last digit, `.`, `-` or
/// `+`; `suffix` is the remainder (a unit such as `rem` or `ms`), kept
/// byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralStyle<'a> {
    pub numeric: &'a str,
    pub suffix: &'a str,
}

impl<'a> LiteralStyle<'a> {
    pub fn split(text: &'a str) -> Self {
        let end = text
            .char_indices()
            .rev()
            .find(|(_, c)| is_numeric_char(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let (numeric, suffix) = text.split_at(end);
        Self { numeric, suffix }
    }

    /// Digits after the decimal point, or `None` for an integer literal.
    pub fn decimals(&self) -> Option<usize> {
        self.numeric
            .split_once('.')
            .map(|(_, frac)| frac.chars().take_while(char::is_ascii_digit).count())
    }

    /// `.5` style: the literal starts at the decimal point (after any sign).
    pub fn omits_leading_zero(&self) -> bool {
        self.numeric
            .trim_start_matches(['+', '-'])
            .starts_with('.')
    }

    pub fn explicit_plus(&self) -> bool {
        self.numeric.starts_with('+')
    }

    /// Parse the numeric body; `None` when it is not a finite number.
    pub fn value(&self) -> Option<f64> {
        self.numeric
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+')
}
