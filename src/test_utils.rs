//! Shared test utilities for the pharmacy core.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{company, medicine, order, user},
    entities,
    errors::Result,
    models::{CompanyFields, MedicineFields, NewUser, OrderItemRequest, OrderRequest},
};
use sea_orm::DatabaseConnection;

/// Password given to every user created through [`create_test_user`].
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Company fields with the given name and test defaults.
pub fn company_fields(name: &str) -> CompanyFields {
    CompanyFields {
        company_name: name.to_string(),
        description: "Test company".to_string(),
        updated_by: "test_user".to_string(),
    }
}

/// Medicine fields with the given name and company, no offer.
pub fn medicine_fields(name: &str, company_id: i64) -> MedicineFields {
    MedicineFields {
        name: name.to_string(),
        description: "Test medicine".to_string(),
        company_id,
        offer: None,
        updated_by: "test_user".to_string(),
    }
}

/// Signup payload with the given name and phone and [`TEST_PASSWORD`].
pub fn new_user(name: &str, phone: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: format!("{phone}@example.com"),
        phone: phone.to_string(),
        password: TEST_PASSWORD.to_string(),
        firm_name: format!("{name} Pharmacy"),
        is_admin: false,
    }
}

/// Creates a test company with sensible defaults.
pub async fn create_test_company(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::company::Model> {
    company::create_company(db, company_fields(name)).await
}

/// Creates a test medicine under `company_id`.
pub async fn create_test_medicine(
    db: &DatabaseConnection,
    name: &str,
    company_id: i64,
) -> Result<entities::medicine::Model> {
    medicine::create_medicine(db, medicine_fields(name, company_id)).await
}

/// Registers a regular (non-admin) test user.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
) -> Result<entities::user::Model> {
    user::sign_up(db, new_user(name, phone)).await
}

/// One order line for `medicine`, ordered from its own company.
pub fn item_request(medicine: &entities::medicine::Model, quantity: i32) -> OrderItemRequest {
    OrderItemRequest {
        medicine_id: medicine.id,
        medicine_name: None,
        company_id: medicine.company_id,
        company_name: None,
        quantity,
    }
}

/// Places a single-line order for `user_id`.
pub async fn create_test_order(
    db: &DatabaseConnection,
    user_id: i64,
    medicine: &entities::medicine::Model,
    quantity: i32,
) -> Result<OrderRequest> {
    let request = OrderRequest {
        items: vec![item_request(medicine, quantity)],
        ..Default::default()
    };
    order::create_order(db, user_id, &request, "test_user").await
}

/// Sets up a complete test environment with a company.
/// Returns (db, company) for common test scenarios.
pub async fn setup_with_company() -> Result<(DatabaseConnection, entities::company::Model)> {
    let db = setup_test_db().await?;
    let company = create_test_company(&db, "Test Company").await?;
    Ok((db, company))
}

/// Sets up a complete test environment with a company and one of its medicines.
/// Returns (db, company, medicine) for medicine-related tests.
pub async fn setup_with_medicine() -> Result<(
    DatabaseConnection,
    entities::company::Model,
    entities::medicine::Model,
)> {
    let (db, company) = setup_with_company().await?;
    let medicine = create_test_medicine(&db, "Test Medicine", company.id).await?;
    Ok((db, company, medicine))
}

/// Everything an order needs: a customer, a company and a medicine.
pub struct OrderFixture {
    /// In-memory database
    pub db: DatabaseConnection,
    /// Regular customer placing orders
    pub user: entities::user::Model,
    /// Company of `medicine`
    pub company: entities::company::Model,
    /// Orderable medicine
    pub medicine: entities::medicine::Model,
}

/// Sets up an [`OrderFixture`].
pub async fn setup_order_fixture() -> Result<OrderFixture> {
    let (db, company, medicine) = setup_with_medicine().await?;
    let user = create_test_user(&db, "Test Customer", "9100000001").await?;
    Ok(OrderFixture {
        db,
        user,
        company,
        medicine,
    })
}
