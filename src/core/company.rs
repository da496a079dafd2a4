//! Company business logic - CRUD over the `company` table.
//!
//! Companies are hard-deleted. Deleting a company that still owns medicines or is
//! referenced by order lines is rejected by the store's foreign keys and surfaces
//! as [`Error::Database`].

use crate::{
    entities::{Company, company},
    errors::{Error, Result},
    models::CompanyFields,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

fn validate(fields: &CompanyFields) -> Result<()> {
    if fields.company_name.trim().is_empty() {
        return Err(Error::validation("Company name cannot be empty"));
    }
    Ok(())
}

/// Retrieves every company ordered by id.
pub async fn get_all_companies<C>(db: &C) -> Result<Vec<company::Model>>
where
    C: ConnectionTrait,
{
    Company::find()
        .order_by_asc(company::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a company by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no company has this id.
pub async fn get_company_by_id<C>(db: &C, company_id: i64) -> Result<company::Model>
where
    C: ConnectionTrait,
{
    Company::find_by_id(company_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "company",
            id: company_id,
        })
}

/// Creates a company. The name is trimmed before it is stored.
pub async fn create_company<C>(db: &C, fields: CompanyFields) -> Result<company::Model>
where
    C: ConnectionTrait,
{
    validate(&fields)?;

    let now = chrono::Utc::now();
    let company = company::ActiveModel {
        company_name: Set(fields.company_name.trim().to_string()),
        description: Set(fields.description),
        updated_by: Set(fields.updated_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = company.insert(db).await?;
    info!("Created company {} ({})", created.id, created.company_name);
    Ok(created)
}

/// Overwrites the name, description and author of an existing company.
pub async fn update_company<C>(
    db: &C,
    company_id: i64,
    fields: CompanyFields,
) -> Result<company::Model>
where
    C: ConnectionTrait,
{
    validate(&fields)?;

    let mut company: company::ActiveModel = get_company_by_id(db, company_id).await?.into();

    company.company_name = Set(fields.company_name.trim().to_string());
    company.description = Set(fields.description);
    company.updated_by = Set(fields.updated_by);
    company.updated_at = Set(chrono::Utc::now());

    company.update(db).await.map_err(Into::into)
}

/// Removes a company after confirming it exists.
pub async fn delete_company<C>(db: &C, company_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let company = get_company_by_id(db, company_id).await?;
    company.delete(db).await?;
    info!("Deleted company {}", company_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_then_get_company() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_company(
            &db,
            CompanyFields {
                company_name: "  Acme Pharma ".to_string(),
                description: "Generics".to_string(),
                updated_by: "tester".to_string(),
            },
        )
        .await?;
        assert!(created.id > 0);
        assert_eq!(created.company_name, "Acme Pharma");

        let fetched = get_company_by_id(&db, created.id).await?;
        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_company_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_company(&db, company_fields("   ")).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));
        assert!(get_all_companies(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_company() -> Result<()> {
        let db = setup_test_db().await?;
        let company = create_test_company(&db, "Old Name").await?;

        let updated = update_company(
            &db,
            company.id,
            CompanyFields {
                company_name: "New Name".to_string(),
                description: "Renamed".to_string(),
                updated_by: "editor".to_string(),
            },
        )
        .await?;

        assert_eq!(updated.id, company.id);
        assert_eq!(updated.company_name, "New Name");
        assert_eq!(updated.updated_by, "editor");
        assert_eq!(updated.created_at, company.created_at);
        assert!(updated.updated_at >= company.updated_at);

        let retrieved = get_company_by_id(&db, company.id).await?;
        assert_eq!(retrieved.description, "Renamed");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_company_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(matches!(
            get_company_by_id(&db, 999).await,
            Err(Error::NotFound { entity: "company", id: 999 })
        ));
        assert!(matches!(
            update_company(&db, 999, company_fields("Nobody")).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            delete_company(&db, 999).await,
            Err(Error::NotFound { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_company() -> Result<()> {
        let db = setup_test_db().await?;
        let keep = create_test_company(&db, "Keep").await?;
        let gone = create_test_company(&db, "Gone").await?;

        delete_company(&db, gone.id).await?;

        let remaining = get_all_companies(&db).await?;
        assert_eq!(remaining, vec![keep]);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_company_with_medicines_is_rejected_by_store() -> Result<()> {
        let (db, company, _medicine) = setup_with_medicine().await?;

        let result = delete_company(&db, company.id).await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(get_company_by_id(&db, company.id).await.is_ok());

        Ok(())
    }
}
