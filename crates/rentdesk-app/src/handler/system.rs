//! Host integration: notifications, folders, links and theme

use chrono::NaiveDate;
use rentdesk_common::RentalError;
use rentdesk_store::{Settings, Tenant};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{AppContext, OperationResult};
use crate::notification::{LeaseExpiryNotice, lease_expiry_notices};

/// Link schemes handed to the browser
const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Host color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemTheme {
    Dark,
    Light,
}

impl std::fmt::Display for SystemTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemTheme::Dark => write!(f, "dark"),
            SystemTheme::Light => write!(f, "light"),
        }
    }
}

/// Show a desktop notification for every lease ending soon
///
/// Returns the notices even when the host fails to display some of them.
pub fn check_notifications(
    ctx: &AppContext,
    tenants: &[Tenant],
    settings: &Settings,
    today: NaiveDate,
) -> OperationResult<Vec<LeaseExpiryNotice>> {
    let notices = lease_expiry_notices(tenants, settings, today);
    for notice in &notices {
        if let Err(e) = ctx.shell().notify(&notice.title, &notice.body) {
            warn!(tenant_id = %notice.tenant_id, error = %e, "Failed to show notification");
        }
    }
    OperationResult::ok(notices)
}

/// Reveal the data file in the system file manager
pub fn open_data_folder(ctx: &AppContext) -> OperationResult<()> {
    let result = ctx
        .shell()
        .show_item_in_folder(ctx.data_store().path())
        .map_err(RentalError::from);
    OperationResult::from_result("open-data-folder", result)
}

pub fn open_external_link(ctx: &AppContext, url: &str) -> OperationResult<()> {
    let lowered = url.trim().to_ascii_lowercase();
    let result = if EXTERNAL_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        ctx.shell().open_external(url.trim()).map_err(RentalError::from)
    } else {
        Err(RentalError::InvalidFormat(format!("unsupported link '{}'", url)))
    };
    OperationResult::from_result("open-external-link", result)
}

pub fn system_theme(ctx: &AppContext) -> OperationResult<SystemTheme> {
    let theme = if ctx.shell().prefers_dark() {
        SystemTheme::Dark
    } else {
        SystemTheme::Light
    };
    OperationResult::ok(theme)
}
