//! Medicine business logic - CRUD, the per-company catalogue view and offer updates.
//!
//! `company_id` is not pre-checked on writes; the foreign key on `medicine.company_id`
//! rejects dangling references and the failure surfaces as [`Error::Database`].

use crate::{
    entities::{Company, Medicine, medicine},
    errors::{Error, Result},
    models::{
        CompanyMedicines, MedicineDetails, MedicineFields, MedicineSummary, UpdateOfferRequest,
    },
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::BTreeMap;
use tracing::{debug, info};

fn validate(fields: &MedicineFields) -> Result<()> {
    if fields.name.trim().is_empty() {
        return Err(Error::validation("Medicine name cannot be empty"));
    }
    if fields.company_id == 0 {
        return Err(Error::validation("Medicine must reference a company"));
    }
    Ok(())
}

/// Blank offers are stored as `NULL`.
fn normalize_offer(offer: Option<String>) -> Option<String> {
    offer
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
}

/// Retrieves a medicine by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no medicine has this id.
pub async fn get_medicine_by_id<C>(db: &C, medicine_id: i64) -> Result<medicine::Model>
where
    C: ConnectionTrait,
{
    Medicine::find_by_id(medicine_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "medicine",
            id: medicine_id,
        })
}

/// Retrieves a medicine joined with its company.
pub async fn get_medicine_details<C>(db: &C, medicine_id: i64) -> Result<MedicineDetails>
where
    C: ConnectionTrait,
{
    let (medicine, company) = Medicine::find_by_id(medicine_id)
        .find_also_related(Company)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "medicine",
            id: medicine_id,
        })?;

    Ok(MedicineDetails { medicine, company })
}

/// Retrieves every medicine as a flat list ordered by id.
pub async fn list_medicines<C>(db: &C) -> Result<Vec<medicine::Model>>
where
    C: ConnectionTrait,
{
    Medicine::find()
        .order_by_asc(medicine::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all medicines grouped by owning company.
///
/// Companies without medicines do not appear. Groups are ordered by company id
/// and medicines within a group by medicine id.
pub async fn get_all_medicines<C>(db: &C) -> Result<Vec<CompanyMedicines>>
where
    C: ConnectionTrait,
{
    let rows = Medicine::find()
        .find_also_related(Company)
        .order_by_asc(medicine::Column::CompanyId)
        .order_by_asc(medicine::Column::Id)
        .all(db)
        .await?;

    let mut groups: BTreeMap<i64, CompanyMedicines> = BTreeMap::new();
    for (medicine, company) in rows {
        let group = groups
            .entry(medicine.company_id)
            .or_insert_with(|| CompanyMedicines {
                company_id: medicine.company_id,
                company_name: company.map(|c| c.company_name).unwrap_or_default(),
                medicines: Vec::new(),
            });
        group.medicines.push(MedicineSummary {
            medicine_id: medicine.id,
            name: medicine.name,
            offer: medicine.offer,
        });
    }

    Ok(groups.into_values().collect())
}

/// Creates a medicine under an existing company.
pub async fn create_medicine<C>(db: &C, fields: MedicineFields) -> Result<medicine::Model>
where
    C: ConnectionTrait,
{
    validate(&fields)?;

    let now = chrono::Utc::now();
    let medicine = medicine::ActiveModel {
        name: Set(fields.name.trim().to_string()),
        description: Set(fields.description),
        company_id: Set(fields.company_id),
        offer: Set(normalize_offer(fields.offer)),
        updated_by: Set(fields.updated_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = medicine.insert(db).await?;
    debug!(
        "Created medicine {} ({}) for company {}",
        created.id, created.name, created.company_id
    );
    Ok(created)
}

/// Overwrites every writable field of an existing medicine.
pub async fn update_medicine<C>(
    db: &C,
    medicine_id: i64,
    fields: MedicineFields,
) -> Result<medicine::Model>
where
    C: ConnectionTrait,
{
    validate(&fields)?;

    let mut medicine: medicine::ActiveModel = get_medicine_by_id(db, medicine_id).await?.into();

    medicine.name = Set(fields.name.trim().to_string());
    medicine.description = Set(fields.description);
    medicine.company_id = Set(fields.company_id);
    medicine.offer = Set(normalize_offer(fields.offer));
    medicine.updated_by = Set(fields.updated_by);
    medicine.updated_at = Set(chrono::Utc::now());

    medicine.update(db).await.map_err(Into::into)
}

/// Removes a medicine after confirming it exists.
pub async fn delete_medicine<C>(db: &C, medicine_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let medicine = get_medicine_by_id(db, medicine_id).await?;
    medicine.delete(db).await?;
    info!("Deleted medicine {}", medicine_id);
    Ok(())
}

/// Sets the offer text on one medicine, or on every medicine of a company when
/// `medicine_id` is 0, in a single statement.
///
/// No existence check is made: ids that match nothing update zero rows and still
/// succeed. Returns the number of rows changed.
///
/// # Errors
/// Returns [`Error::Validation`] if `company_id` is 0 or `offer` is blank.
pub async fn update_offer_for_medicine<C>(
    db: &C,
    request: &UpdateOfferRequest,
    updated_by: &str,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    if request.company_id == 0 {
        return Err(Error::validation("Company ID is required"));
    }
    let offer = request.offer.trim();
    if offer.is_empty() {
        return Err(Error::validation("Offer cannot be empty"));
    }

    let update = Medicine::update_many()
        .col_expr(medicine::Column::Offer, Expr::value(offer.to_string()))
        .col_expr(medicine::Column::UpdatedBy, Expr::value(updated_by.to_string()))
        .col_expr(medicine::Column::UpdatedAt, Expr::value(chrono::Utc::now()));

    let update = if request.medicine_id == 0 {
        update.filter(medicine::Column::CompanyId.eq(request.company_id))
    } else {
        update.filter(medicine::Column::Id.eq(request.medicine_id))
    };

    let result = update.exec(db).await?;
    info!(
        "Offer '{}' applied to {} medicine(s) (medicine {}, company {})",
        offer, result.rows_affected, request.medicine_id, request.company_id
    );
    Ok(result.rows_affected)
}
