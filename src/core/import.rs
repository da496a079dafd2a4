//! CSV import of medicines.
//!
//! Expected layout is `name,description,company_name[,...]` with a header row.
//! The header is dropped without being checked and columns past the third are
//! ignored. Companies are matched by trimmed, lowercased name against what is
//! already stored plus what this import has created so far; unknown names get a
//! new company.
//!
//! Each row commits on its own: an auto-created company and the medicine that
//! needed it are written in one transaction, but the file as a whole is not.
//! The first store error stops the import and rows before it stay committed.
//! The name map is local to one call, so two imports running at the same time
//! can each create the same company.

use crate::{
    core::{company, medicine},
    entities::Company,
    errors::Result,
    models::{CompanyFields, ImportSummary, MedicineFields, SkippedRow},
};
use sea_orm::{ConnectionTrait, EntityTrait, TransactionTrait};
use std::{collections::HashMap, io::Read, path::Path};
use tracing::{debug, error, info, warn};

/// Description given to companies created on the fly.
pub const AUTO_COMPANY_DESCRIPTION: &str = "Auto-generated via CSV";

const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";

fn company_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Imports medicines from the CSV file at `path`.
///
/// # Errors
/// - [`crate::errors::Error::Io`] if the file cannot be read
/// - [`crate::errors::Error::Database`] on the first company or medicine insert
///   the store rejects
pub async fn import_medicines<C, P>(db: &C, path: P, updated_by: &str) -> Result<ImportSummary>
where
    C: ConnectionTrait + TransactionTrait,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .inspect_err(|e| error!("Cannot read CSV file {}: {}", path.display(), e))?;
    let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    info!("Importing medicines from {}", path.display());
    import_medicines_from_reader(db, data, updated_by).await
}

/// Imports medicines from any CSV byte source. See [`import_medicines`].
pub async fn import_medicines_from_reader<C, R>(
    db: &C,
    source: R,
    updated_by: &str,
) -> Result<ImportSummary>
where
    C: ConnectionTrait + TransactionTrait,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let mut companies: HashMap<String, i64> = Company::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (company_key(&c.company_name), c.id))
        .collect();

    let mut summary = ImportSummary::default();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                skip(&mut summary, line, format!("unreadable row: {e}"));
                continue;
            }
        };
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() < 3 {
            skip(
                &mut summary,
                line,
                format!("expected at least 3 fields, found {}", record.len()),
            );
            continue;
        }

        let name = record[0].trim();
        let description = record[1].trim();
        let company_name = record[2].trim();
        if name.is_empty() {
            skip(&mut summary, line, "missing medicine name".to_string());
            continue;
        }
        if company_name.is_empty() {
            skip(&mut summary, line, "missing company name".to_string());
            continue;
        }

        let key = company_key(company_name);
        let known_company = companies.get(&key).copied();

        let txn = db.begin().await?;
        let company_id = match known_company {
            Some(id) => id,
            None => {
                let created = company::create_company(
                    &txn,
                    CompanyFields {
                        company_name: company_name.to_string(),
                        description: AUTO_COMPANY_DESCRIPTION.to_string(),
                        updated_by: updated_by.to_string(),
                    },
                )
                .await
                .inspect_err(|e| error!("Import aborted at line {}: {}", line, e))?;
                created.id
            }
        };

        medicine::create_medicine(
            &txn,
            MedicineFields {
                name: name.to_string(),
                description: description.to_string(),
                company_id,
                offer: None,
                updated_by: updated_by.to_string(),
            },
        )
        .await
        .inspect_err(|e| error!("Import aborted at line {}: {}", line, e))?;

        txn.commit().await?;

        if known_company.is_none() {
            debug!("Auto-created company '{}' from line {}", company_name, line);
            companies.insert(key, company_id);
            summary.companies_created += 1;
        }
        summary.medicines_inserted += 1;
    }

    info!(
        "CSV import finished: {} medicine(s), {} new company(ies), {} row(s) skipped",
        summary.medicines_inserted,
        summary.companies_created,
        summary.skipped.len()
    );
    Ok(summary)
}

fn skip(summary: &mut ImportSummary, line: u64, reason: String) {
    warn!("Skipping CSV line {}: {}", line, reason);
    summary.skipped.push(SkippedRow { line, reason });
}
