//! Request and response shapes exchanged with the boundary.
//!
//! Entities in [`crate::entities`] are returned as-is for plain CRUD. The types
//! here cover inputs and the flattened or grouped views that do not map one to
//! one onto a table.

use crate::entities::{OrderStatus, company, medicine, user};
use serde::{Deserialize, Serialize};

/// Writable fields of a company, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyFields {
    /// Display name
    pub company_name: String,
    /// Free-text description
    pub description: String,
    /// Who is performing the write
    pub updated_by: String,
}

/// Writable fields of a medicine, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicineFields {
    /// Medicine name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Owning company; must reference an existing row
    pub company_id: i64,
    /// Optional promotional text
    pub offer: Option<String>,
    /// Who is performing the write
    pub updated_by: String,
}

/// Sets the offer on one medicine, or on every medicine of a company when
/// `medicine_id` is 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOfferRequest {
    /// Target medicine, or 0 for the whole company
    pub medicine_id: i64,
    /// Company whose medicines are updated when `medicine_id` is 0; always required
    pub company_id: i64,
    /// Offer text, must not be blank
    pub offer: String,
}

/// A medicine together with the company that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineDetails {
    /// The medicine row
    #[serde(flatten)]
    pub medicine: medicine::Model,
    /// Owning company, `None` only if the row vanished between reads
    pub company: Option<company::Model>,
}

/// One medicine inside [`CompanyMedicines`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineSummary {
    /// Medicine id
    pub medicine_id: i64,
    /// Medicine name
    pub name: String,
    /// Current offer, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
}

/// Catalogue view: medicines grouped under the company that owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMedicines {
    /// Company id
    pub company_id: i64,
    /// Company name
    pub company_name: String,
    /// Medicines of this company, ordered by id
    pub medicines: Vec<MedicineSummary>,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Number of medicine rows written
    pub medicines_inserted: usize,
    /// Number of companies created because no existing name matched
    pub companies_created: usize,
    /// Rows that were ignored, in file order
    pub skipped: Vec<SkippedRow>,
}

/// A CSV row that was ignored during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based line number in the file
    pub line: u64,
    /// Why the row was skipped
    pub reason: String,
}

/// Signup payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    /// Full name, required
    pub name: String,
    /// Contact email, optional
    pub email: String,
    /// Phone number, required and unique
    pub phone: String,
    /// Plaintext password, required; only its hash is stored
    pub password: String,
    /// Firm the user orders for
    pub firm_name: String,
    /// Grants access to every order
    pub is_admin: bool,
}

/// Profile update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    /// Full name, required
    pub name: String,
    /// Phone number, required
    pub phone: String,
    /// Firm the user orders for
    pub firm_name: String,
    /// Grants access to every order
    pub is_admin: bool,
}

/// Sign-in payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Phone number
    pub identifier: String,
    /// Plaintext password
    pub password: String,
}

/// Public projection of a user returned after signup or sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Phone number
    pub phone_number: String,
    /// Full name
    pub name: String,
    /// Admin flag
    pub is_admin: bool,
}

impl From<&user::Model> for UserResponse {
    fn from(user: &user::Model) -> Self {
        Self {
            phone_number: user.phone.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Owner details attached to orders for privileged callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Firm name
    pub firm_name: String,
}

impl From<&user::Model> for UserDetails {
    fn from(user: &user::Model) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone(),
            firm_name: user.firm_name.clone(),
        }
    }
}

/// Flat wire shape of an order aggregate, used both as input and as output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Order id; ignored on input
    #[serde(default)]
    pub order_id: i64,
    /// Owner of the order
    #[serde(default)]
    pub user_id: i64,
    /// Current status; ignored on input
    #[serde(default)]
    pub status: OrderStatus,
    /// Order lines
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    /// Owner details, present only for privileged readers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDetails>,
}

/// One line of an [`OrderRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Ordered medicine
    pub medicine_id: i64,
    /// Medicine name, filled on output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_name: Option<String>,
    /// Company the medicine is ordered from
    pub company_id: i64,
    /// Company name, filled on output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Number of units
    pub quantity: i32,
}

/// Status change payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status, validated against [`OrderStatus`]
    pub status: String,
}
