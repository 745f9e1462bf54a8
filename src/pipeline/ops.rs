//! Step operators
//!
//! All operators are pure functions `(PipelineState, config) -> PipelineState`
//! (or `Result` where a fatal condition exists). None assumes anything about
//! prior steps beyond the stated state invariants. Group iteration order is
//! always first-occurrence order, so output entry order is deterministic.

use indexmap::IndexMap;
use serde_json::Value;

use super::{Parameters, PipelineState, SeriesPair};
use crate::error::Error;
use crate::group::{group_key, GroupKey};
use crate::step::{Axis, ScoreMethod};

/// Fatal operator failure, without step context.
///
/// The engine wraps this with the step index and action name before it
/// reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// Group members (or an x/y pairing) with unequal lengths
    ShapeMismatch(String),
    /// A transform produced a non-finite value
    NonFinite(String),
}

impl OpError {
    /// Attach step context, producing the crate-level error.
    #[must_use]
    pub fn into_error(self, index: usize, action: &'static str) -> Error {
        match self {
            Self::ShapeMismatch(detail) => Error::ShapeMismatch {
                index,
                action,
                detail,
            },
            Self::NonFinite(detail) => Error::NonFinite {
                index,
                action,
                detail,
            },
        }
    }
}

/// Restrict every parameter set to `keys`, in the order listed.
///
/// Series are untouched; this only changes what later steps group on and what
/// labels show.
#[must_use]
pub fn compare(mut state: PipelineState, keys: &[String]) -> PipelineState {
    state.parameters = state
        .parameters
        .into_iter()
        .map(|params| {
            keys.iter()
                .filter_map(|key| params.get(key).map(|value| (key.clone(), value.clone())))
                .collect()
        })
        .collect();
    state
}

/// Remove `keys` from every parameter set. Series are untouched.
#[must_use]
pub fn drop_keys(mut state: PipelineState, keys: &[String]) -> PipelineState {
    state.parameters = state
        .parameters
        .into_iter()
        .map(|params| exclude_keys(&params, keys))
        .collect();
    state
}

/// Keep the single best-scoring entry of each group.
///
/// Entries are grouped by their canonical key with `exclude` removed;
/// `max_final`/`min_final` rank by the last `y` element, `max_auc`/`min_auc`
/// by the mean of `y`. Ties are first-occurrence-wins: an entry only replaces
/// the incumbent on strict improvement. Entries with empty `y` carry no score
/// and never beat a scored member; a group of only unscored members keeps its
/// first.
#[must_use]
pub fn best(state: PipelineState, score: ScoreMethod, exclude: &[String]) -> PipelineState {
    let groups = group_indices(&state, exclude);
    let mut parameters = Vec::with_capacity(groups.len());
    let mut series = Vec::with_capacity(groups.len());

    for members in groups.values() {
        let mut best_index = members[0];
        let mut best_score = score_of(&state.series[best_index], score);
        for &index in &members[1..] {
            let candidate = score_of(&state.series[index], score);
            if beats(score, candidate, best_score) {
                best_index = index;
                best_score = candidate;
            }
        }
        parameters.push(state.parameters[best_index].clone());
        series.push(state.series[best_index].clone());
    }

    PipelineState { parameters, series }
}

/// Element-wise mean of each group's `x` and `y`.
///
/// Members of a group must have pairwise equal `x` lengths and pairwise equal
/// `y` lengths; otherwise the evaluation aborts with a shape mismatch. With
/// `with_std`, the element-wise population standard deviation of `y` is
/// attached as `y_std`. The group's parameter set is its first member's with
/// `exclude` removed.
///
/// # Errors
/// Returns [`OpError::ShapeMismatch`] on unequal member lengths.
pub fn average(
    state: PipelineState,
    exclude: &[String],
    with_std: bool,
) -> Result<PipelineState, OpError> {
    let groups = group_indices(&state, exclude);
    let mut parameters = Vec::with_capacity(groups.len());
    let mut series = Vec::with_capacity(groups.len());

    for members in groups.values() {
        let first = &state.series[members[0]];
        for &index in members {
            let member = &state.series[index];
            if member.x.len() != first.x.len() || member.y.len() != first.y.len() {
                return Err(OpError::ShapeMismatch(format!(
                    "group member lengths differ: x {} != {} or y {} != {}",
                    member.x.len(),
                    first.x.len(),
                    member.y.len(),
                    first.y.len(),
                )));
            }
        }

        let count = members.len() as f64;
        let mean_x = (0..first.x.len())
            .map(|i| members.iter().map(|&m| state.series[m].x[i]).sum::<f64>() / count)
            .collect();
        let mean_y: Vec<f64> = (0..first.y.len())
            .map(|i| members.iter().map(|&m| state.series[m].y[i]).sum::<f64>() / count)
            .collect();

        let y_std = with_std.then(|| {
            (0..first.y.len())
                .map(|i| {
                    let mean = mean_y[i];
                    let variance = members
                        .iter()
                        .map(|&m| (state.series[m].y[i] - mean).powi(2))
                        .sum::<f64>()
                        / count;
                    variance.sqrt()
                })
                .collect()
        });

        parameters.push(exclude_keys(&state.parameters[members[0]], exclude));
        series.push(SeriesPair {
            x: mean_x,
            y: mean_y,
            y_std,
        });
    }

    Ok(PipelineState { parameters, series })
}

/// Smooth each `y` independently with a centered window mean.
///
/// Half-width is `round(window_size / 2) - 1` on each side, clamped to valid
/// indices at the boundaries (boundary windows are simply shorter). Window
/// sizes 1 and 2 are the identity. `x` and parameters are untouched.
///
/// # Errors
/// Returns [`OpError::ShapeMismatch`] when a populated `x` does not pair with
/// `y`.
pub fn moving_average(
    mut state: PipelineState,
    window_size: usize,
) -> Result<PipelineState, OpError> {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let half_width = ((window_size as f64 / 2.0).round() as isize - 1).max(0) as usize;

    for (entry, pair) in state.series.iter_mut().enumerate() {
        if !pair.x.is_empty() && !pair.y.is_empty() && pair.x.len() != pair.y.len() {
            return Err(OpError::ShapeMismatch(format!(
                "entry {entry}: x length {} != y length {}",
                pair.x.len(),
                pair.y.len(),
            )));
        }
        let y = &pair.y;
        let smoothed: Vec<f64> = (0..y.len())
            .map(|i| {
                let lo = i.saturating_sub(half_width);
                let hi = (i + half_width + 1).min(y.len());
                y[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
            })
            .collect();
        pair.y = smoothed;
    }
    Ok(state)
}

/// Concatenate each group's points and sort them ascending by `x`.
///
/// Every member must have paired `x`/`y` sequences. The sort is stable over
/// first-occurrence member order. The group's parameter set is its first
/// member's with `exclude` removed; any std band is not carried over.
///
/// # Errors
/// Returns [`OpError::ShapeMismatch`] when a member's `x` and `y` lengths
/// differ.
pub fn merge(state: PipelineState, exclude: &[String]) -> Result<PipelineState, OpError> {
    let groups = group_indices(&state, exclude);
    let mut parameters = Vec::with_capacity(groups.len());
    let mut series = Vec::with_capacity(groups.len());

    for members in groups.values() {
        let mut points: Vec<(f64, f64)> = Vec::new();
        for &index in members {
            let member = &state.series[index];
            if member.x.len() != member.y.len() {
                return Err(OpError::ShapeMismatch(format!(
                    "entry {index}: x length {} != y length {}",
                    member.x.len(),
                    member.y.len(),
                )));
            }
            points.extend(member.x.iter().copied().zip(member.y.iter().copied()));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (x, y) = points.into_iter().unzip();
        parameters.push(exclude_keys(&state.parameters[members[0]], exclude));
        series.push(SeriesPair::new(x, y));
    }

    Ok(PipelineState { parameters, series })
}

/// Keep entries matching any of the single-key predicates.
///
/// Each predicate contributes its first key/value pair; an entry survives if
/// its parameter set holds exactly that value under that key for at least one
/// predicate. Survivor order is preserved.
#[must_use]
pub fn filter(state: PipelineState, predicates: &[IndexMap<String, Value>]) -> PipelineState {
    let constraints: Vec<(&String, &Value)> = predicates
        .iter()
        .filter_map(|predicate| predicate.iter().next())
        .collect();

    let mut parameters = Vec::new();
    let mut series = Vec::new();
    for (params, pair) in state.parameters.into_iter().zip(state.series) {
        let keep = constraints
            .iter()
            .any(|(key, value)| params.get(*key) == Some(*value));
        if keep {
            parameters.push(params);
            series.push(pair);
        }
    }
    PipelineState { parameters, series }
}

/// Replace the named axis of every series with `ln(1 + value)` element-wise.
///
/// # Errors
/// Returns [`OpError::NonFinite`] when any transformed element is not finite
/// (input below -1, NaN, or infinite).
pub fn log_transform(mut state: PipelineState, axis: Axis) -> Result<PipelineState, OpError> {
    let axis_name = match axis {
        Axis::X => "x",
        Axis::Y => "y",
    };
    for (entry, pair) in state.series.iter_mut().enumerate() {
        let values = match axis {
            Axis::X => &mut pair.x,
            Axis::Y => &mut pair.y,
        };
        for (i, value) in values.iter_mut().enumerate() {
            let transformed = (1.0 + *value).ln();
            if !transformed.is_finite() {
                return Err(OpError::NonFinite(format!(
                    "entry {entry}: log(1 + {axis_name}[{i}]) of {value} is not finite"
                )));
            }
            *value = transformed;
        }
    }
    Ok(state)
}

/// Shift every `y` down by the global `y` minimum plus `epsilon`, so the
/// global floor sits just above zero (supports log-scaled axes downstream).
///
/// When no series holds any `y` value, the state passes through unchanged.
#[must_use]
pub fn subtract_min(mut state: PipelineState, epsilon: f64) -> PipelineState {
    let global_min = state
        .series
        .iter()
        .flat_map(|pair| pair.y.iter().copied())
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.min(v)))
        });
    let Some(global_min) = global_min else {
        return state;
    };

    let shift = global_min + epsilon;
    for pair in &mut state.series {
        for value in &mut pair.y {
            *value -= shift;
        }
    }
    state
}

/// Bucket entry indices by canonical group key, in first-occurrence order.
fn group_indices(state: &PipelineState, exclude: &[String]) -> IndexMap<GroupKey, Vec<usize>> {
    let mut groups: IndexMap<GroupKey, Vec<usize>> = IndexMap::new();
    for (index, params) in state.parameters.iter().enumerate() {
        groups
            .entry(group_key(params, exclude))
            .or_default()
            .push(index);
    }
    groups
}

fn exclude_keys(params: &Parameters, exclude: &[String]) -> Parameters {
    params
        .iter()
        .filter(|(key, _)| !exclude.iter().any(|e| e == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn score_of(pair: &SeriesPair, score: ScoreMethod) -> Option<f64> {
    match score {
        ScoreMethod::MaxFinal | ScoreMethod::MinFinal => pair.y.last().copied(),
        ScoreMethod::MaxAuc | ScoreMethod::MinAuc => {
            if pair.y.is_empty() {
                None
            } else {
                Some(pair.y.iter().sum::<f64>() / pair.y.len() as f64)
            }
        }
    }
}

/// Strict-improvement comparison; equal scores keep the incumbent.
fn beats(score: ScoreMethod, candidate: Option<f64>, incumbent: Option<f64>) -> bool {
    match (candidate, incumbent) {
        (Some(c), Some(b)) => match score {
            ScoreMethod::MaxFinal | ScoreMethod::MaxAuc => c > b,
            ScoreMethod::MinFinal | ScoreMethod::MinAuc => c < b,
        },
        (Some(_), None) => true,
        _ => false,
    }
}
