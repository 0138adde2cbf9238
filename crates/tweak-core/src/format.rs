//! Rendering new values in the style of an existing literal.
//!
//! The rules, applied to the literal being replaced:
//! - an integer literal stays an integer (value rounded to nearest),
//! - a decimal literal keeps `max(its decimals, decimals of step)` places,
//! - `.5` style literals keep dropping the leading zero,
//! - the unit suffix is copied verbatim.

use crate::literal::LiteralStyle;
use crate::spec::Bounds;

/// Formatting rules derived from a template literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFormat {
    /// `None` renders an integer without a decimal point.
    decimals: Option<usize>,
    omit_leading_zero: bool,
    explicit_plus: bool,
    suffix: String,
}

/// A value after clamping and rounding, together with its rendered text.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedValue {
    pub value: f64,
    pub text: String,
}

impl ValueFormat {
    pub fn from_template(template: &str, step: Option<f64>) -> Self {
        let style = LiteralStyle::split(template);
        let decimals = style
            .decimals()
            .map(|own| own.max(step.map(step_decimals).unwrap_or(0)));
        Self {
            decimals,
            omit_leading_zero: style.omits_leading_zero(),
            explicit_plus: style.explicit_plus(),
            suffix: style.suffix.to_string(),
        }
    }

    /// Take leading-dot and `+` style from `template` instead. The current
    /// text cannot show either once it has rendered a value like `1.5` or `-2`.
    pub fn with_sign_style_of(mut self, template: &str) -> Self {
        let style = LiteralStyle::split(template);
        self.omit_leading_zero = style.omits_leading_zero();
        self.explicit_plus = style.explicit_plus();
        self
    }

    pub fn decimals(&self) -> Option<usize> {
        self.decimals
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Round `value` to the rendered precision.
    pub fn round(&self, value: f64) -> f64 {
        let scale = self.scale();
        let rounded = (value * scale).round() / scale;
        if rounded == 0.0 && value != 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Clamp into `bounds`, then round to the rendered precision without
    /// stepping back outside the range.
    pub fn quantize(&self, value: f64, bounds: &Bounds) -> f64 {
        let scale = self.scale();
        let rounded = self.round(bounds.clamp(value));
        if rounded > bounds.max() {
            let inside = (bounds.max() * scale).floor() / scale;
            if inside >= bounds.min() { inside } else { rounded }
        } else if rounded < bounds.min() {
            let inside = (bounds.min() * scale).ceil() / scale;
            if inside <= bounds.max() { inside } else { rounded }
        } else {
            rounded
        }
    }

    pub fn render(&self, value: f64) -> String {
        let mut body = match self.decimals {
            Some(places) => format!("{:.*}", places, value),
            None => format!("{:.0}", value.round()),
        };

        // A tiny negative that rounds to zero renders as plain zero, while an
        // exact negative zero keeps its sign.
        if value != 0.0
            && body.starts_with('-')
            && body[1..].chars().all(|c| c == '0' || c == '.')
        {
            body.remove(0);
        }

        if self.omit_leading_zero {
            if let Some(rest) = body.strip_prefix("0.") {
                body = format!(".{rest}");
            } else if let Some(rest) = body.strip_prefix("-0.") {
                body = format!("-.{rest}");
            }
        }
        if self.decimals == Some(0) {
            body.push('.');
        }
        if self.explicit_plus && !body.starts_with('-') {
            body.insert(0, '+');
        }

        body.push_str(&self.suffix);
        body
    }

    /// Clamp, round and render in one go.
    pub fn format_within(&self, value: f64, bounds: &Bounds) -> FormattedValue {
        let value = self.quantize(value, bounds);
        FormattedValue {
            value,
            text: self.render(value),
        }
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.decimals.unwrap_or(0) as i32)
    }
}

/// Render `value` in the style of `template`, unbounded.
pub fn format_value(template: &str, value: f64, step: Option<f64>) -> String {
    let format = ValueFormat::from_template(template, step);
    format.render(format.round(value))
}

/// Most decimal places a step can imply. Beyond this an f64 step is noise.
pub const MAX_STEP_DECIMALS: usize = 15;

/// Decimal places implied by a step, e.g. `0.05` -> 2, `1` -> 0.
pub fn step_decimals(step: f64) -> usize {
    let fixed = format!("{:.*}", MAX_STEP_DECIMALS, step.abs());
    fixed
        .split_once('.')
        .map(|(_, frac)| frac.trim_end_matches('0').len())
        .unwrap_or(0)
}
