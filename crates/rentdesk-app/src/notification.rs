//! Lease-expiry reminders

use chrono::NaiveDate;
use rentdesk_common::{DEFAULT_DATE_FORMAT, parse_iso_date};
use rentdesk_store::{Settings, Tenant};
use serde::Serialize;

pub const LEASE_EXPIRY_TITLE: &str = "Lease Expiry Reminder";

/// One reminder about a lease that ends soon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseExpiryNotice {
    pub tenant_id: String,
    pub title: String,
    pub body: String,
    pub days_until_expiry: i64,
}

/// Reminders for active tenants whose lease ends within the notice window
///
/// A lease ending today or earlier produces no reminder.
pub fn lease_expiry_notices(
    tenants: &[Tenant],
    settings: &Settings,
    today: NaiveDate,
) -> Vec<LeaseExpiryNotice> {
    if !settings.notify_lease_expiry {
        return Vec::new();
    }
    let window = i64::from(settings.notify_lease_days);

    tenants
        .iter()
        .filter(|t| t.is_active())
        .filter_map(|tenant| {
            let end = tenant.contract_end_date().as_deref().and_then(parse_iso_date)?;
            let days = (end - today).num_days();
            (days > 0 && days <= window).then(|| LeaseExpiryNotice {
                tenant_id: tenant.id().map(|id| id.to_string()).unwrap_or_default(),
                title: LEASE_EXPIRY_TITLE.to_string(),
                body: format!(
                    "The lease for {} is expiring in {} days on {}.",
                    tenant.name(),
                    days,
                    end.format(DEFAULT_DATE_FORMAT)
                ),
                days_until_expiry: days,
            })
        })
        .collect()
}
