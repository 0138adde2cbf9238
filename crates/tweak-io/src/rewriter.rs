use crate::locate::{locate_literal, Located};
use crate::path_policy::{canonicalize_best_effort, ensure_within_root, resolve_spec_path};
use crate::read::{char_window, read_file_to_string_abs, splice_chars};
use crate::write::write_file_atomic;

use super::*;

/// Lifecycle of one tracked parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamState {
    /// On-disk text matches `current_text`.
    Clean,
    /// A write is in flight.
    Writing,
    /// The last write failed; see `last_error`. A successful apply or reset clears it.
    Disabled,
}

/// One numeric literal under live management.
#[derive(Debug, Clone)]
pub struct TrackedParameter {
    id: ParamId,
    file_path: PathBuf,
    line: usize,
    column: usize,
    current_text: String,
    original_text: String,
    original_value: f64,
    bounds: Bounds,
    step: Option<f64>,
    unit: Option<String>,
    state: ParamState,
    last_error: Option<RewriteError>,
}

impl TrackedParameter {
    fn from_spec(spec: ParamSpec, root: Option<&Path>) -> Result<Self, SpecError> {
        spec.validate()?;
        let bounds = spec.bounds()?;
        let original_value = spec.original_value()?;
        let file_path = resolve_spec_path(&spec.id, &spec.file_path, root)?;

        if let Some(unit) = spec.unit.as_deref() {
            let suffix = LiteralStyle::split(&spec.original_text).suffix;
            if suffix != unit {
                tracing::warn!(
                    id = %spec.id,
                    unit,
                    suffix,
                    "declared unit differs from the literal's suffix; keeping the suffix"
                );
            }
        }

        Ok(Self {
            id: spec.id,
            file_path,
            line: spec.line,
            column: spec.column,
            current_text: spec.original_text.clone(),
            original_text: spec.original_text,
            original_value,
            bounds,
            step: spec.step,
            unit: spec.unit,
            state: ParamState::Clean,
            last_error: None,
        })
    }

    pub fn id(&self) -> &ParamId {
        &self.id
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn original_value(&self) -> f64 {
        self.original_value
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn state(&self) -> ParamState {
        self.state
    }

    pub fn last_error(&self) -> Option<&RewriteError> {
        self.last_error.as_ref()
    }

    /// Best-effort parse of `current_text`, falling back to the original value.
    pub fn current_value(&self) -> f64 {
        LiteralStyle::split(&self.current_text)
            .value()
            .unwrap_or(self.original_value)
    }

    /// Clamp, round and render `value`: precision and suffix follow the
    /// current text, leading-dot and `+` style follow the original.
    pub fn format(&self, value: f64) -> FormattedValue {
        ValueFormat::from_template(&self.current_text, self.step)
            .with_sign_style_of(&self.original_text)
            .format_within(value, &self.bounds)
    }

    pub fn status(&self) -> ParamStatus {
        ParamStatus {
            id: self.id.clone(),
            state: self.state,
            last_error: self.last_error.as_ref().map(ToString::to_string),
            file_path: self.file_path.clone(),
            line: self.line,
            column: self.column,
            current_text: self.current_text.clone(),
            value: self.current_value(),
        }
    }
}

/// Snapshot of a parameter for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamStatus {
    pub id: ParamId,
    pub state: ParamState,
    pub last_error: Option<String>,
    pub file_path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub current_text: String,
    pub value: f64,
}

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedChange {
    pub id: ParamId,
    /// The value actually written, after clamping and rounding.
    pub value: f64,
    pub text: String,
    pub file_path: PathBuf,
    pub line: usize,
    /// Column after drift correction.
    pub column: usize,
    /// Characters the literal had moved since it was last seen.
    pub drift: isize,
    /// Siblings on the same line whose columns were shifted.
    pub shifted: Vec<ParamId>,
}

/// Owner of the tracked-parameter set.
///
/// Methods take `&mut self`: whoever owns the rewriter serializes every
/// mutation, including the multi-step read/locate/write/adjust sequence of an
/// apply. [`crate::RewriterActor`] is that owner in the threaded setup.
#[derive(Debug)]
pub struct ParamRewriter {
    params: BTreeMap<ParamId, TrackedParameter>,
    project_root: Option<PathBuf>,
    sync_parent_dir: bool,
}

impl ParamRewriter {
    /// Build from discovery output. Relative paths are resolved against
    /// `project_root`, which is canonicalized here.
    pub fn new(specs: Vec<ParamSpec>, project_root: Option<PathBuf>) -> Result<Self, SpecError> {
        validate_specs(&specs)?;
        let project_root = project_root.map(|root| canonicalize_best_effort(&root));
        let params = specs
            .into_iter()
            .map(|spec| {
                TrackedParameter::from_spec(spec, project_root.as_deref()).map(|p| (p.id.clone(), p))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        tracing::debug!(
            params = params.len(),
            root = ?project_root,
            "parameter rewriter initialized"
        );
        Ok(Self {
            params,
            project_root,
            sync_parent_dir: true,
        })
    }

    pub fn with_sync_parent_dir(mut self, sync_parent_dir: bool) -> Self {
        self.sync_parent_dir = sync_parent_dir;
        self
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn get(&self, id: &ParamId) -> Option<&TrackedParameter> {
        self.params.get(id)
    }

    pub fn ids(&self) -> Vec<ParamId> {
        self.params.keys().cloned().collect()
    }

    pub fn status(&self, id: &ParamId) -> Option<ParamStatus> {
        self.params.get(id).map(TrackedParameter::status)
    }

    pub fn statuses(&self) -> BTreeMap<ParamId, ParamStatus> {
        self.params
            .iter()
            .map(|(id, p)| (id.clone(), p.status()))
            .collect()
    }

    pub fn current_values(&self) -> BTreeMap<ParamId, f64> {
        self.params
            .iter()
            .map(|(id, p)| (id.clone(), p.current_value()))
            .collect()
    }

    /// Write `value` (clamped into the parameter's bounds) into its literal.
    ///
    /// On failure the parameter is disabled and keeps the error as
    /// `last_error`; a later success clears both.
    pub async fn apply_change(
        &mut self,
        id: &ParamId,
        value: f64,
    ) -> Result<AppliedChange, RewriteError> {
        let param = self
            .params
            .get_mut(id)
            .ok_or_else(|| RewriteError::UnknownParam { id: id.clone() })?;
        if !value.is_finite() {
            return Err(RewriteError::InvalidValue {
                id: id.clone(),
                value,
            });
        }
        let previous = param.state;
        param.state = ParamState::Writing;

        let result = self.write_value(id, value).await;

        let Some(param) = self.params.get_mut(id) else {
            return result;
        };
        match &result {
            Ok(change) => {
                param.state = ParamState::Clean;
                param.last_error = None;
                tracing::debug!(
                    %id,
                    path = %change.file_path.display(),
                    line = change.line,
                    column = change.column,
                    text = %change.text,
                    "literal rewritten"
                );
            }
            Err(e) => {
                if e.disables() {
                    param.state = ParamState::Disabled;
                    param.last_error = Some(e.clone());
                } else {
                    param.state = previous;
                }
                tracing::warn!(%id, error = %e, "rewrite failed");
            }
        }
        result
    }

    /// Write the parameter's original value back.
    pub async fn reset_param(&mut self, id: &ParamId) -> Result<f64, RewriteError> {
        let original = self.original_value(id)?;
        self.reset_change(id).await.map(|_| original)
    }

    /// Like [`Self::reset_param`], but reports the full write outcome.
    pub async fn reset_change(&mut self, id: &ParamId) -> Result<AppliedChange, RewriteError> {
        let original = self.original_value(id)?;
        self.apply_change(id, original).await
    }

    /// Reset every parameter independently. One failure does not stop or
    /// undo the others.
    pub async fn reset_all(&mut self) -> BTreeMap<ParamId, Result<f64, RewriteError>> {
        self.reset_all_with(|_, _| {}).await
    }

    /// [`Self::reset_all`], calling `on_each` with every write outcome as it lands.
    pub async fn reset_all_with(
        &mut self,
        mut on_each: impl FnMut(&ParamId, &Result<AppliedChange, RewriteError>),
    ) -> BTreeMap<ParamId, Result<f64, RewriteError>> {
        let mut outcomes = BTreeMap::new();
        for id in self.ids() {
            let original = self.original_value(&id);
            let change = self.reset_change(&id).await;
            on_each(&id, &change);
            outcomes.insert(id, change.and_then(|_| original));
        }
        outcomes
    }

    fn original_value(&self, id: &ParamId) -> Result<f64, RewriteError> {
        self.params
            .get(id)
            .map(TrackedParameter::original_value)
            .ok_or_else(|| RewriteError::UnknownParam { id: id.clone() })
    }

    async fn write_value(&mut self, id: &ParamId, value: f64) -> Result<AppliedChange, RewriteError> {
        let param = self
            .params
            .get(id)
            .ok_or_else(|| RewriteError::UnknownParam { id: id.clone() })?;
        let file_path = param.file_path.clone();
        let line_no = param.line;
        let stored_column = param.column;
        let old_text = param.current_text.clone();
        let formatted = param.format(value);

        // Root check precedes any file access.
        let path = ensure_within_root(&file_path, self.project_root.as_deref())?;
        let content = read_file_to_string_abs(&path).await?;

        let lines: Vec<&str> = content.split('\n').collect();
        // The empty segment after a trailing newline is not a line of its own.
        let line_count = if content.ends_with('\n') {
            lines.len() - 1
        } else {
            lines.len()
        };
        let line_idx = line_no - 1;
        let line = lines
            .get(line_idx)
            .filter(|_| line_idx < line_count)
            .ok_or_else(|| RewriteError::FileRead {
                path: path.clone(),
                reason: format!("line {line_no} out of range ({line_count} lines)"),
            })?;

        let (column, drift) = match locate_literal(line, param.column, &old_text) {
            Located::Found { column, drift } => (column, drift),
            Located::Mismatch { found } => {
                return Err(RewriteError::VerificationFailed {
                    id: id.clone(),
                    path,
                    line: line_no,
                    column: param.column,
                    expected: old_text,
                    found,
                })
            }
        };
        if drift != 0 {
            tracing::warn!(%id, from = param.column, to = column, "literal drifted; column corrected");
        }

        let old_len = old_text.chars().count();
        debug_assert_eq!(char_window(line, column - 1, old_len), old_text);
        let new_line = splice_chars(line, column - 1, old_len, &formatted.text);
        let new_content = lines
            .iter()
            .enumerate()
            .map(|(i, l)| if i == line_idx { new_line.as_str() } else { *l })
            .join("\n");

        write_file_atomic(&path, &new_content, self.sync_parent_dir).await?;

        let length_diff = formatted.text.chars().count() as isize - old_len as isize;
        // Siblings are ordered by stored columns, which drift together with this one.
        let shifted = self.shift_siblings(id, &file_path, line_no, stored_column, length_diff);

        if let Some(param) = self.params.get_mut(id) {
            param.current_text = formatted.text.clone();
            param.column = column;
        }

        Ok(AppliedChange {
            id: id.clone(),
            value: formatted.value,
            text: formatted.text,
            file_path,
            line: line_no,
            column,
            drift,
            shifted,
        })
    }

    /// Move every literal stored after `column` on the same line by
    /// `length_diff` characters.
    fn shift_siblings(
        &mut self,
        written: &ParamId,
        file_path: &Path,
        line: usize,
        column: usize,
        length_diff: isize,
    ) -> Vec<ParamId> {
        if length_diff == 0 {
            return Vec::new();
        }
        self.params
            .values_mut()
            .filter(|p| {
                &p.id != written && p.file_path == file_path && p.line == line && p.column > column
            })
            .map(|p| {
                p.column = (p.column as isize + length_diff).max(1) as usize;
                tracing::trace!(id = %p.id, column = p.column, "sibling column shifted");
                p.id.clone()
            })
            .collect()
    }
}
