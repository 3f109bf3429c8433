//! Ticker entities and the derived details record.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::ticker_code::Market;

/// A stored, user-owned ticker with explicit statistical values.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDefinedTicker {
    pub id: i64,
    pub user_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub sector: Option<String>,
    pub drift: f64,
    pub volatility: f64,
    pub jump_intensity: f64,
    pub jump_mean: f64,
    pub jump_std_dev: f64,
}

/// Fields of a user-defined ticker that can change after creation.
/// Present fields are applied one by one, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TickerUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sector: Option<String>,
    pub drift: Option<f64>,
    pub volatility: Option<f64>,
    pub jump_intensity: Option<f64>,
    pub jump_mean: Option<f64>,
    pub jump_std_dev: Option<f64>,
}

impl UserDefinedTicker {
    pub fn apply_update(&mut self, update: &TickerUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(sector) = &update.sector {
            self.sector = Some(sector.clone());
        }
        if let Some(drift) = update.drift {
            self.drift = drift;
        }
        if let Some(volatility) = update.volatility {
            self.volatility = volatility;
        }
        if let Some(jump_intensity) = update.jump_intensity {
            self.jump_intensity = jump_intensity;
        }
        if let Some(jump_mean) = update.jump_mean {
            self.jump_mean = jump_mean;
        }
        if let Some(jump_std_dev) = update.jump_std_dev {
            self.jump_std_dev = jump_std_dev;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TickerType {
    #[serde(rename = "BUILT_IN")]
    BuiltIn,
    #[serde(rename = "USER_DEFINED")]
    UserDefined,
}

/// Fully resolved ticker parameters. Derived output only: computed fresh on
/// every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerDetails {
    pub ticker_code: String,
    pub name: String,
    pub description: Option<String>,
    pub sector: Option<String>,
    pub drift: f64,
    pub volatility: f64,
    pub jump_intensity: f64,
    pub jump_mean: f64,
    pub jump_std_dev: f64,
    pub market: Market,
    #[serde(rename = "type")]
    pub ticker_type: TickerType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ticker() -> UserDefinedTicker {
        UserDefinedTicker {
            id: 1,
            user_id: Uuid::new_v4(),
            code: "HHHB".to_string(),
            name: "Hydra Holdings".to_string(),
            description: None,
            sector: Some("Shipping".to_string()),
            drift: 3.5,
            volatility: 22.0,
            jump_intensity: 1.2,
            jump_mean: 0.4,
            jump_std_dev: 2.1,
        }
    }

    #[test]
    fn apply_update_merges_present_fields_only() {
        let mut ticker = sample_ticker();
        ticker.apply_update(&TickerUpdate {
            name: Some("Hydra Global".to_string()),
            drift: Some(4.0),
            ..Default::default()
        });

        assert_eq!(ticker.name, "Hydra Global");
        assert_eq!(ticker.drift, 4.0);
        // Untouched fields survive.
        assert_eq!(ticker.volatility, 22.0);
        assert_eq!(ticker.sector.as_deref(), Some("Shipping"));
        assert_eq!(ticker.description, None);
    }

    #[test]
    fn apply_update_can_set_optional_fields() {
        let mut ticker = sample_ticker();
        ticker.apply_update(&TickerUpdate {
            description: Some("Container freight".to_string()),
            ..Default::default()
        });
        assert_eq!(ticker.description.as_deref(), Some("Container freight"));
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut ticker = sample_ticker();
        let before = ticker.clone();
        ticker.apply_update(&TickerUpdate::default());
        assert_eq!(ticker, before);
    }

    #[test]
    fn ticker_type_serializes_as_screaming_case() {
        assert_eq!(
            serde_json::to_string(&TickerType::BuiltIn).unwrap(),
            "\"BUILT_IN\""
        );
        assert_eq!(
            serde_json::to_string(&TickerType::UserDefined).unwrap(),
            "\"USER_DEFINED\""
        );
    }
}
