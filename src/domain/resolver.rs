//! Ticker code resolution.
//!
//! The category letter selects exactly one path: a reserved built-in letter
//! resolves purely from the static category table, anything else is an
//! owner-scoped point lookup in the ticker store. No code can match both.

use uuid::Uuid;

use crate::domain::category::{built_in_category, interpolate, round2, BuiltInCategory};
use crate::domain::error::FauxtickError;
use crate::domain::ticker::{TickerDetails, TickerType, UserDefinedTicker};
use crate::domain::ticker_code::TickerCode;
use crate::ports::ticker_store::TickerStore;

/// Resolve a validated code to its full parameter set, scoped to the
/// requesting owner for user-defined codes.
pub fn resolve(
    store: &dyn TickerStore,
    owner_id: Uuid,
    code: &TickerCode,
) -> Result<TickerDetails, FauxtickError> {
    if let Some(category) = built_in_category(code.category_letter()) {
        return Ok(resolve_built_in(code, category));
    }

    let record = store
        .get_by_owner_and_code(owner_id, code.as_str())?
        .ok_or_else(|| FauxtickError::NotFound {
            what: format!("ticker {code}"),
        })?;

    Ok(resolve_user_defined(code, &record))
}

/// Built-in resolution: every value is interpolated from the code's letters,
/// so the full 26x26 parameter surface per category needs no storage at all.
pub fn resolve_built_in(code: &TickerCode, category: &BuiltInCategory) -> TickerDetails {
    let stats_letter = code.stats_letter();
    let (drift_low, drift_high) = category.drift_range;
    let (vol_low, vol_high) = category.volatility_range;
    let drift = round2(interpolate(stats_letter, drift_low, drift_high));
    let volatility = round2(interpolate(stats_letter, vol_low, vol_high));

    let jump_letter = code.jump_letter();
    let (ji_low, ji_high) = category.jump_intensity_range;
    let (jm_low, jm_high) = category.jump_mean_range;
    let (js_low, js_high) = category.jump_std_dev_range;
    let jump_intensity = round2(interpolate(jump_letter, ji_low, ji_high));
    let jump_mean = round2(interpolate(jump_letter, jm_low, jm_high));
    let jump_std_dev = round2(interpolate(jump_letter, js_low, js_high));

    TickerDetails {
        ticker_code: code.as_str().to_string(),
        name: category.name.to_string(),
        description: Some(category.description.to_string()),
        sector: Some(category.sector.to_string()),
        drift,
        volatility,
        jump_intensity,
        jump_mean,
        jump_std_dev,
        market: code.market(),
        ticker_type: TickerType::BuiltIn,
    }
}

/// User-defined resolution: statistical values come verbatim from the stored
/// record; only the market is derived from the code.
pub fn resolve_user_defined(code: &TickerCode, record: &UserDefinedTicker) -> TickerDetails {
    TickerDetails {
        ticker_code: code.as_str().to_string(),
        name: record.name.clone(),
        description: record.description.clone(),
        sector: record.sector.clone(),
        drift: record.drift,
        volatility: record.volatility,
        jump_intensity: record.jump_intensity,
        jump_mean: record.jump_mean,
        jump_std_dev: record.jump_std_dev,
        market: code.market(),
        ticker_type: TickerType::UserDefined,
    }
}
