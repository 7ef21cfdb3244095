use crate::error::Result;
use crate::models::{Organization, SlugRecord};
use crate::services::random_id::{save_with_random_id, IdPolicy};
use crate::services::sanitize::clean_fields;
use crate::services::slug::assign_slug;
use crate::Database;
use rand::Rng;
use rusqlite::{OptionalExtension, TransactionBehavior};

const SELECT_COLUMNS: &str = "SELECT id, name, slug, description FROM organizations";

/// Validates and persists `org`: sanitize, then slug, then id and write.
///
/// Slug probing, id probing and the write run in one IMMEDIATE transaction.
/// A failed save restores the slug it started with, and leaves a new record
/// without an id, so the whole save can be retried.
pub fn save<R: Rng + ?Sized>(
    db: &Database,
    org: &mut Organization,
    rng: &mut R,
    policy: &IdPolicy,
) -> Result<()> {
    clean_fields(org, &[])?;

    let was_new = org.is_new();
    let slug_before = org.slug.clone();
    let mut conn = db.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let written = assign_slug(&tx, org)
        .and_then(|_| save_with_random_id(&tx, org, rng, policy))
        .and_then(|_| tx.commit().map_err(Into::into));

    if let Err(err) = written {
        org.slug = slug_before;
        if was_new {
            org.id = None;
        }
        return Err(err);
    }

    org.mark_slug_persisted();
    tracing::info!(id = ?org.id, slug = %org.slug, "Saved organization");
    Ok(())
}

pub fn create(
    db: &Database,
    name: &str,
    slug: Option<&str>,
    description: Option<&str>,
    policy: &IdPolicy,
) -> Result<Organization> {
    let mut org = Organization::new(name);
    if let Some(slug) = slug {
        org.slug = slug.to_string();
    }
    org.description = description.map(String::from);

    save(db, &mut org, &mut rand::thread_rng(), policy)?;
    Ok(org)
}

pub fn get_by_id(db: &Database, id: &str) -> Result<Option<Organization>> {
    let conn = db.get()?;
    let org = conn
        .query_row(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
            [id],
            Organization::from_row,
        )
        .optional()?;
    Ok(org)
}

pub fn get_by_slug(db: &Database, slug: &str) -> Result<Option<Organization>> {
    let conn = db.get()?;
    let org = conn
        .query_row(
            &format!("{} WHERE slug = ?", SELECT_COLUMNS),
            [slug],
            Organization::from_row,
        )
        .optional()?;
    Ok(org)
}

pub fn list(db: &Database) -> Result<Vec<Organization>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!("{} ORDER BY name, slug", SELECT_COLUMNS))?;
    let orgs = stmt
        .query_map([], Organization::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(orgs)
}
