//! Merge field values for a tenant's contract

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rentdesk_common::{Result, format_amount, format_date, format_display_date};
use rentdesk_store::{Property, Tenant};

/// Every merge field a contract template may reference
pub const FIELD_NAMES: [&str; 12] = [
    "tenant_name",
    "tenant_id_number",
    "tenant_phone",
    "tenant_address",
    "property_address",
    "property_type",
    "monthly_rent",
    "deposit",
    "rent_due_day",
    "contract_start_date",
    "contract_end_date",
    "current_date",
];

/// Flat mapping from merge field name to rendered value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeFields(BTreeMap<String, String>);

impl MergeFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping for `tenant`
    ///
    /// A missing property leaves its fields empty rather than failing. An
    /// unusable `date_format` is a template error.
    pub fn for_tenant(
        tenant: &Tenant,
        property: Option<&Property>,
        today: NaiveDate,
        date_format: &str,
    ) -> Result<Self> {
        let amount = |v: Option<f64>| v.map(format_amount).unwrap_or_default();

        let mut fields = Self::new();
        fields.insert("tenant_name", tenant.name());
        fields.insert("tenant_id_number", tenant.id_number().unwrap_or_default());
        fields.insert("tenant_phone", tenant.phone().unwrap_or_default());
        fields.insert("tenant_address", tenant.address().unwrap_or_default());
        fields.insert(
            "property_address",
            property.map(Property::address).unwrap_or_default(),
        );
        fields.insert(
            "property_type",
            property.map(Property::property_type).unwrap_or_default(),
        );
        fields.insert("monthly_rent", amount(tenant.monthly_rent()));
        fields.insert("deposit", amount(tenant.deposit()));
        fields.insert(
            "rent_due_day",
            tenant.rent_due_day().map(|d| d.to_string()).unwrap_or_default(),
        );
        fields.insert(
            "contract_start_date",
            format_display_date(tenant.contract_start_date().as_deref(), date_format)?,
        );
        fields.insert(
            "contract_end_date",
            format_display_date(tenant.contract_end_date().as_deref(), date_format)?,
        );
        fields.insert("current_date", format_date(today, date_format)?);
        Ok(fields)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentdesk_common::RentalError;

    fn tenant() -> Tenant {
        Tenant::new("t-1")
            .with("name", "Avi Levi")
            .with("id_number", "012345678")
            .with("phone", "050-1234567")
            .with("address", "7 Hanevi'im St")
            .with("property_id", "p-1")
            .with("monthly_rent", 5200.0)
            .with("deposit", 10400.5)
            .with("rent_due_day", 10)
            .with("contract_start_date", "2026-02-01")
            .with("is_active", true)
    }

    #[test]
    fn test_fields_cover_every_name() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let fields = MergeFields::for_tenant(&tenant(), None, today, "%d.%m.%Y").unwrap();
        assert_eq!(fields.len(), FIELD_NAMES.len());
        for name in FIELD_NAMES {
            assert!(fields.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_field_values() {
        let property = Property::new("p-1")
            .with("address", "22 Jaffa Rd")
            .with("property_type", "studio");
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let fields = MergeFields::for_tenant(&tenant(), Some(&property), today, "%d.%m.%Y").unwrap();

        assert_eq!(fields.get("tenant_name"), Some("Avi Levi"));
        assert_eq!(fields.get("property_address"), Some("22 Jaffa Rd"));
        assert_eq!(fields.get("property_type"), Some("studio"));
        assert_eq!(fields.get("monthly_rent"), Some("5200"));
        assert_eq!(fields.get("deposit"), Some("10400.5"));
        assert_eq!(fields.get("rent_due_day"), Some("10"));
        assert_eq!(fields.get("contract_start_date"), Some("01.02.2026"));
        assert_eq!(fields.get("contract_end_date"), Some("—"));
        assert_eq!(fields.get("current_date"), Some("19.10.2026"));
    }

    #[test]
    fn test_dangling_property_renders_empty() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let fields = MergeFields::for_tenant(&tenant(), None, today, "%d/%m/%Y").unwrap();
        assert_eq!(fields.get("property_address"), Some(""));
        assert_eq!(fields.get("property_type"), Some(""));
        assert_eq!(fields.get("current_date"), Some("05/01/2026"));
    }

    #[test]
    fn test_unusable_date_format_is_an_error() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let result = MergeFields::for_tenant(&tenant(), None, today, "%Q");
        assert!(matches!(result, Err(RentalError::TemplateError(_))));
    }

    #[test]
    fn test_loosely_typed_values() {
        let tenant = Tenant::new("t-2")
            .with("name", "Rina")
            .with("id_number", 123456789)
            .with("monthly_rent", "3500")
            .with("deposit", "")
            .with("rent_due_day", 40);
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let fields = MergeFields::for_tenant(&tenant, None, today, "%d.%m.%Y").unwrap();

        assert_eq!(fields.get("tenant_id_number"), Some("123456789"));
        assert_eq!(fields.get("monthly_rent"), Some("3500"));
        assert_eq!(fields.get("deposit"), Some(""));
        assert_eq!(fields.get("rent_due_day"), Some(""));
    }
}
