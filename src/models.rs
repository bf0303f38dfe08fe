use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Explicit text encoding for persisted timestamps (RFC 3339, UTC, full precision).
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn encode(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn decode(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|at| at.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::{decode, encode};
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => serializer.serialize_some(&encode(at)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| decode(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

// ===== PRODUCTS =====

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub category: String,
    pub price: f64,
    /// Suggested quantity for Sunday to Wednesday (and Saturday).
    pub qty_window_a: u32,
    /// Suggested quantity for Thursday.
    pub qty_window_b: u32,
    /// Suggested quantity for Friday.
    pub qty_window_c: u32,
    pub created_by: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewProduct {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub price: f64,
    pub qty_window_a: u32,
    pub qty_window_b: u32,
    pub qty_window_c: u32,
    pub created_by: Uuid,
}

/// Partial product update; `None` keeps the current value.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub qty_window_a: Option<u32>,
    pub qty_window_b: Option<u32>,
    pub qty_window_c: Option<u32>,
}

/// One unvalidated row of a bulk import, as text.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct BulkRow {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub price: Option<String>,
    pub qty_window_a: Option<String>,
    pub qty_window_b: Option<String>,
    pub qty_window_c: Option<String>,
}

/// Supplier delivery cadence a suggested quantity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryWindow {
    A,
    B,
    C,
}

impl DeliveryWindow {
    pub fn for_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Thu => DeliveryWindow::B,
            Weekday::Fri => DeliveryWindow::C,
            // Sunday to Wednesday, plus Saturday as the weekend batch
            Weekday::Sun | Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Sat => {
                DeliveryWindow::A
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeliveryWindow::A => "Dom-Mié",
            DeliveryWindow::B => "Jueves",
            DeliveryWindow::C => "Viernes",
        }
    }
}

// ===== ORDERS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Sent,
    Delivered,
}

/// Line item with name, unit and price captured when the order was submitted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub supplier_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    pub fn items_total(items: &[OrderItem]) -> f64 {
        items.iter().map(OrderItem::line_total).sum()
    }
}

/// Requested quantity of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub user_name: String,
    pub lines: Vec<OrderLine>,
    /// Falls back to the default supplier email in settings when blank.
    pub supplier_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub this_month_orders: usize,
}

// ===== USERS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: ApprovalStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Uuid>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may always sign in; everyone else only once approved.
    pub fn can_sign_in(&self) -> bool {
        self.is_admin() || self.status == ApprovalStatus::Approved
    }
}

/// Persisted shape of a user: the public record plus its credential hash.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

// ===== REMINDERS =====

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// 0 = Sunday .. 6 = Saturday
    pub weekdays: BTreeSet<u8>,
    /// Zero-padded 24h `HH:MM`
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
    pub created_by: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewReminder {
    pub title: String,
    pub description: String,
    pub weekdays: BTreeSet<u8>,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
    pub created_by: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weekdays: Option<BTreeSet<u8>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub active: Option<bool>,
}

// ===== NOTIFICATIONS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    UserRegistration,
    OrderReminder,
    General,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Entity the notification is about, e.g. the user awaiting approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Uuid>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

// ===== SETTINGS =====

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub default_supplier_email: String,
    pub company_name: String,
    pub currency: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_supplier_email: String::new(),
            company_name: String::new(),
            currency: "ARS".to_string(),
        }
    }
}
