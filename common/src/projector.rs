use crate::models::{CurrencyNames, DisplayMode, RangeKey, RateSnapshot, RowViewModel};
use crate::trend;

/// Inputs for one rate table projection
#[derive(Debug, Clone, Copy)]
pub struct TableRequest<'a> {
    /// Currency every row is quoted against
    pub base: &'a str,
    /// Currency pinned to the top of the table
    pub focus: &'a str,
    pub range: RangeKey,
    pub mode: DisplayMode,
}

impl<'a> TableRequest<'a> {
    /// Build a request from the user's (from, to) selection
    pub fn for_pair(from: &'a str, to: &'a str, range: RangeKey, mode: DisplayMode) -> Self {
        let (base, focus) = mode.resolve(from, to);
        Self {
            base,
            focus,
            range,
            mode,
        }
    }
}

/// Project a snapshot into sorted, trend-annotated table rows.
///
/// The base never appears as a row. The focus currency is considered even
/// when the snapshot lacks it, but rows without a usable rate are dropped.
/// The focus row comes first, the rest ascend by code.
pub fn project(
    request: &TableRequest<'_>,
    snapshot: &RateSnapshot,
    names: &CurrencyNames,
) -> Vec<RowViewModel> {
    let mut candidates: Vec<&str> = snapshot.rates.keys().map(String::as_str).collect();
    if !request.focus.is_empty()
        && request.focus != request.base
        && !snapshot.rates.contains_key(request.focus)
    {
        candidates.push(request.focus);
    }

    let offset = request.mode.seed_offset();
    let mut rows: Vec<RowViewModel> = candidates
        .into_iter()
        .filter(|code| *code != request.base)
        .enumerate()
        .filter_map(|(index, code)| snapshot.rate(code).map(|rate| (index, code, rate)))
        .map(|(index, code, rate)| {
            let trend = trend::generate(request.range, index as u64 + offset);
            RowViewModel {
                code: code.to_string(),
                name: names.get(code).cloned().unwrap_or_else(|| code.to_string()),
                rate,
                change_pct: trend::change_pct(&trend),
                trend,
                focus: code == request.focus,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.focus.cmp(&a.focus).then_with(|| a.code.cmp(&b.code)));
    rows
}
