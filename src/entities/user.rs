//! User entity - A pharmacy customer or administrator.
//!
//! `phone` is the external identifier and carries a unique index. The password
//! column stores an argon2 PHC string and is never serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact email, may be empty
    pub email: String,
    /// Phone number used to sign in
    #[sea_orm(unique)]
    pub phone: String,
    /// Argon2 hash of the password
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Name of the pharmacy or firm the user orders for
    pub firm_name: String,
    /// Whether the user may see and manage every order
    pub is_admin: bool,
    /// Who last wrote this row
    pub updated_by: String,
    /// When the user signed up
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user places many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
