//! Entity model for the primary data store
//!
//! Records are kept as the JSON objects the presentation layer wrote. The
//! backend reads the fields it needs through typed accessors that parse on
//! read, so a value it cannot interpret is left in place instead of failing
//! the whole file, and a load/save cycle writes every record back unchanged.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Record identifier; the presentation layer has written both strings and numbers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    /// Read an id from a stored JSON value
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RecordId::Text(s.clone())),
            Value::Number(n) => Some(
                n.as_i64()
                    .map(RecordId::Number)
                    .unwrap_or_else(|| RecordId::Text(n.to_string())),
            ),
            _ => None,
        }
    }

    /// Compare against an id received as text from the boundary
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            RecordId::Text(s) => s == raw,
            RecordId::Number(n) => raw.trim().parse::<i64>().is_ok_and(|v| v == *n),
        }
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{}", s),
            RecordId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Text(s) => Value::String(s),
            RecordId::Number(n) => Value::from(n),
        }
    }
}

/// Text form of a scalar; numbers and booleans are rendered as written
fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts a JSON number or a numeric string
fn number_value(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

macro_rules! json_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            fields: Map<String, Value>,
        }

        impl $name {
            /// Record holding only an `id`
            pub fn new(id: impl Into<RecordId>) -> Self {
                Self::default().with("id", id.into())
            }

            pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
                self.set(key, value);
                self
            }

            pub fn set(&mut self, key: &str, value: impl Into<Value>) {
                self.fields.insert(key.to_string(), value.into());
            }

            pub fn get(&self, key: &str) -> Option<&Value> {
                self.fields.get(key)
            }

            /// Every stored field, including the ones the backend never reads
            pub fn fields(&self) -> &Map<String, Value> {
                &self.fields
            }

            pub fn id(&self) -> Option<RecordId> {
                self.get("id").and_then(RecordId::from_value)
            }

            pub fn has_id(&self, raw: &str) -> bool {
                self.id().is_some_and(|id| id.matches(raw))
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(fields: Map<String, Value>) -> Self {
                Self { fields }
            }
        }
    };
}

json_record!(
    /// Rental property
    Property
);

json_record!(
    /// Tenant and lease terms
    Tenant
);

json_record!(
    /// Auxiliary record shared by events, expenses and payments
    LedgerRecord
);

pub type Event = LedgerRecord;
pub type Expense = LedgerRecord;
pub type Payment = LedgerRecord;

impl Property {
    pub fn address(&self) -> String {
        text_value(self.get("address")).unwrap_or_default()
    }

    pub fn property_type(&self) -> String {
        text_value(self.get("property_type")).unwrap_or_default()
    }
}

impl Tenant {
    pub fn name(&self) -> String {
        text_value(self.get("name")).unwrap_or_default()
    }

    pub fn id_number(&self) -> Option<String> {
        text_value(self.get("id_number"))
    }

    pub fn phone(&self) -> Option<String> {
        text_value(self.get("phone"))
    }

    pub fn address(&self) -> Option<String> {
        text_value(self.get("address"))
    }

    /// Weak reference; may name a property that no longer exists
    pub fn property_id(&self) -> Option<RecordId> {
        self.get("property_id").and_then(RecordId::from_value)
    }

    pub fn monthly_rent(&self) -> Option<f64> {
        number_value(self.get("monthly_rent"))
    }

    pub fn deposit(&self) -> Option<f64> {
        number_value(self.get("deposit"))
    }

    /// Day of month the rent is due, when it names one
    pub fn rent_due_day(&self) -> Option<u32> {
        number_value(self.get("rent_due_day"))
            .filter(|v| v.fract() == 0.0 && (1.0..=31.0).contains(v))
            .map(|v| v as u32)
    }

    pub fn contract_start_date(&self) -> Option<String> {
        text_value(self.get("contract_start_date"))
    }

    pub fn contract_end_date(&self) -> Option<String> {
        text_value(self.get("contract_end_date"))
    }

    pub fn is_active(&self) -> bool {
        match self.get("is_active") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn contract_template_id(&self) -> Option<String> {
        text_value(self.get("contract_template_id")).filter(|id| !id.trim().is_empty())
    }

    pub fn set_contract_template_id(&mut self, document_id: &str) {
        self.set("contract_template_id", document_id);
    }
}

/// A collection written as `null` reads as empty
fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The full in-memory collection persisted as one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub properties: Vec<Property>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub tenants: Vec<Tenant>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub events: Vec<Event>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub expenses: Vec<Expense>,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub payments: Vec<Payment>,
    /// Top-level keys outside the five collections
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataSet {
    pub fn find_tenant(&self, id: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.has_id(id))
    }

    pub fn find_tenant_mut(&mut self, id: &str) -> Option<&mut Tenant> {
        self.tenants.iter_mut().find(|t| t.has_id(id))
    }

    /// Dangling references resolve to `None`
    pub fn find_property(&self, id: &RecordId) -> Option<&Property> {
        let raw = id.to_string();
        self.properties.iter().find(|p| p.has_id(&raw))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.tenants.is_empty()
            && self.events.is_empty()
            && self.expenses.is_empty()
            && self.payments.is_empty()
    }
}
