//! Medicine entity - A sellable product owned by exactly one company.
//!
//! `offer` holds an optional promotional string that can be set per medicine or
//! for every medicine of a company at once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medicine database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medicine")]
pub struct Model {
    /// Unique identifier for the medicine
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Medicine name (e.g., "Paracetamol 500mg")
    pub name: String,
    /// Free-text description
    pub description: String,
    /// ID of the owning company
    pub company_id: i64,
    /// Promotional text such as "10% off"; `None` when no offer runs
    pub offer: Option<String>,
    /// Who last wrote this row
    pub updated_by: String,
    /// When the medicine was created
    pub created_at: DateTimeUtc,
    /// When the medicine was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Medicine and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each medicine belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// Order lines that reference this medicine
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
