//! Discovery input: one record per numeric literal to track.

use std::path::PathBuf;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::literal::LiteralStyle;
use crate::ParamId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("Duplicate parameter id: {id}")]
    DuplicateId { id: ParamId },

    #[error("Invalid bounds for {id}: min {min} / max {max}")]
    InvalidBounds { id: ParamId, min: f64, max: f64 },

    #[error("Invalid step for {id}: {step}")]
    InvalidStep { id: ParamId, step: f64 },

    #[error("Line and column are 1-indexed, got {line}:{column} for {id}")]
    ZeroPosition {
        id: ParamId,
        line: usize,
        column: usize,
    },

    #[error("Original text {text:?} of {id} is not a number")]
    NotNumeric { id: ParamId, text: String },

    #[error("Relative path {path} for {id} needs a configured project root")]
    RelativePath { id: ParamId, path: PathBuf },

    #[error("Malformed discovery input: {0}")]
    Json(String),
}

/// Inclusive numeric range. Always finite with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A numeric literal as reported by the discovery process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    pub id: ParamId,
    /// Absolute, or relative to the project root.
    pub file_path: PathBuf,
    /// 1-indexed.
    pub line: usize,
    /// 1-indexed, counted in characters.
    pub column: usize,
    pub original_text: String,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ParamSpec {
    pub fn new(
        id: impl Into<ParamId>,
        file_path: impl Into<PathBuf>,
        line: usize,
        column: usize,
        original_text: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            id: id.into(),
            file_path: file_path.into(),
            line,
            column,
            original_text: original_text.into(),
            min,
            max,
            step: None,
            unit: None,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn bounds(&self) -> Result<Bounds, SpecError> {
        Bounds::new(self.min, self.max).ok_or_else(|| SpecError::InvalidBounds {
            id: self.id.clone(),
            min: self.min,
            max: self.max,
        })
    }

    pub fn original_value(&self) -> Result<f64, SpecError> {
        LiteralStyle::split(&self.original_text)
            .value()
            .ok_or_else(|| SpecError::NotNumeric {
                id: self.id.clone(),
                text: self.original_text.clone(),
            })
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.line == 0 || self.column == 0 {
            return Err(SpecError::ZeroPosition {
                id: self.id.clone(),
                line: self.line,
                column: self.column,
            });
        }
        self.bounds()?;
        if let Some(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(SpecError::InvalidStep {
                    id: self.id.clone(),
                    step,
                });
            }
        }
        self.original_value()?;
        Ok(())
    }
}

/// Validate every record and reject duplicate ids.
pub fn validate_specs(specs: &[ParamSpec]) -> Result<(), SpecError> {
    if let Some(id) = specs.iter().map(|s| &s.id).duplicates().next() {
        return Err(SpecError::DuplicateId { id: id.clone() });
    }
    specs.iter().try_for_each(ParamSpec::validate)
}

/// Parse and validate the discovery process's JSON array.
pub fn parse_specs_json(input: &str) -> Result<Vec<ParamSpec>, SpecError> {
    let specs: Vec<ParamSpec> =
        serde_json::from_str(input).map_err(|e| SpecError::Json(e.to_string()))?;
    validate_specs(&specs)?;
    Ok(specs)
}
