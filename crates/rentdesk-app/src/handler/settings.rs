//! Settings load and save

use rentdesk_common::{RentalError, Result};
use rentdesk_store::Settings;
use serde_json::Value;

use crate::model::{AppContext, OperationResult};

pub fn load_settings(ctx: &AppContext) -> OperationResult<Settings> {
    OperationResult::ok(ctx.settings_store().load())
}

pub fn save_settings(ctx: &AppContext, settings: &Settings) -> OperationResult<()> {
    OperationResult::from_result("save-settings", ctx.settings_store().save(settings))
}

/// Apply `key=value` assignments to `settings`
///
/// Keys use the stored camelCase names. Values are read as JSON when they
/// parse, otherwise as plain strings.
pub fn apply_assignments(settings: &Settings, assignments: &[String]) -> Result<Settings> {
    let mut value = serde_json::to_value(settings)
        .map_err(|e| RentalError::InvalidFormat(e.to_string()))?;
    let Value::Object(map) = &mut value else {
        return Err(RentalError::InvalidFormat("settings are not an object".to_string()));
    };

    for assignment in assignments {
        let (key, raw) = assignment
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| {
                RentalError::InvalidFormat(format!("expected KEY=VALUE, got '{}'", assignment))
            })?;
        let parsed =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.trim().to_string(), parsed);
    }

    serde_json::from_value(value).map_err(|e| RentalError::InvalidFormat(e.to_string()))
}

pub fn update_settings(ctx: &AppContext, assignments: &[String]) -> OperationResult<Settings> {
    let result = apply_assignments(&ctx.settings_store().load(), assignments).and_then(|updated| {
        ctx.settings_store().save(&updated)?;
        Ok(updated)
    });
    OperationResult::from_result("save-settings", result)
}
