//! Company entity - A manufacturer or distributor that medicines belong to.
//!
//! Companies are created explicitly or implicitly while importing a medicine CSV,
//! where `company_name` serves as the case-insensitive dedup key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    /// Unique identifier for the company
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, also the natural key used by CSV import
    pub company_name: String,
    /// Free-text description
    pub description: String,
    /// Who last wrote this row
    pub updated_by: String,
    /// When the company was created
    pub created_at: DateTimeUtc,
    /// When the company was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Company and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One company has many medicines
    #[sea_orm(has_many = "super::medicine::Entity")]
    Medicines,
    /// Order lines reference the company they were ordered from
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::medicine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medicines.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
