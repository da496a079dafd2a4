//! Database configuration module for the pharmacy back end.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so foreign keys (including the cascade from `order_item` to `orders`) and the unique
//! phone index follow the Rust structs without hand-written SQL.

use crate::entities::{Company, Medicine, Order, OrderItem, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

/// Default `SQLite` location used when neither the environment nor the settings file name one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pharmacy.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
///
/// The returned handle is pooled internally and is passed by reference into every
/// repository and assembler operation.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables using `SeaORM`'s schema generation from entity definitions.
///
/// Parents are created before children so foreign keys resolve. Existing tables
/// are left untouched.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Company),
        schema.create_table_from_entity(Medicine),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderItem),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        company::Model as CompanyModel, medicine::Model as MedicineModel,
        order::Model as OrderModel, order_item::Model as OrderItemModel,
        user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CompanyModel> = Company::find().limit(1).all(&db).await?;
        let _: Vec<MedicineModel> = Medicine::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<OrderItemModel> = OrderItem::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
