use crate::db;
use crate::error::Result;
use crate::models::{SlugRecord, Value};
use rusqlite::Connection;
use slug::slugify;

pub const DEFAULT_SLUG_MAX_LENGTH: usize = 50;

/// Base used when a name has no characters that survive normalization.
pub const EMPTY_SLUG_FALLBACK: &str = "untitled";

/// Normalizes `name` into a lowercase, hyphen-separated ASCII slug of at
/// most `max_length` characters.
pub fn generate_slug(name: &str, max_length: usize) -> String {
    let slug = truncate(&slugify(name), max_length);
    if slug.is_empty() {
        truncate(EMPTY_SLUG_FALLBACK, max_length)
    } else {
        slug
    }
}

pub fn validate_slug(slug: &str, max_length: usize) -> bool {
    if slug.is_empty() || slug.len() > max_length {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Looser rule for slugs typed in by a user: ASCII letters of either case,
/// digits, underscores and hyphens.
pub fn validate_slug_input(slug: &str, max_length: usize) -> bool {
    if slug.is_empty() || slug.len() > max_length {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Candidate for the `x`-th collision: the base cut short enough that
/// `-x` still fits within `max_length`.
pub fn suffixed_slug(base: &str, x: u32, max_length: usize) -> String {
    let slug_length = max_length.saturating_sub(x.ilog10() as usize + 2);
    format!("{}-{}", truncate(base, slug_length), x)
}

fn truncate(slug: &str, max_length: usize) -> String {
    let cut: String = slug.chars().take(max_length).collect();
    cut.trim_end_matches('-').to_string()
}

/// Fills in and disambiguates `record`'s slug ahead of a write on `conn`.
///
/// An empty slug is derived from the name. The uniqueness check runs only
/// for new records or when the slug moved away from its persisted value, so
/// re-saving an unchanged record never renames it.
pub fn assign_slug<R: SlugRecord>(conn: &Connection, record: &mut R) -> Result<()> {
    let max_length = R::slug_max_length();

    if record.slug().is_empty() {
        let derived = generate_slug(record.name(), max_length);
        record.set_slug(derived);
    }

    let changed = record.persisted_slug() != Some(record.slug());
    if !record.is_new() && !changed {
        return Ok(());
    }

    let base = record.slug().to_string();
    let mut candidate = base.clone();
    let mut x: u32 = 0;
    while slug_taken(conn, record, &candidate)? {
        x += 1;
        candidate = suffixed_slug(&base, x, max_length);
        tracing::debug!(table = R::TABLE, %candidate, "Slug taken, trying next suffix");
    }

    if x > 0 {
        tracing::debug!(table = R::TABLE, %base, slug = %candidate, "Disambiguated slug");
    }
    record.set_slug(candidate);
    Ok(())
}

fn slug_taken<R: SlugRecord>(conn: &Connection, record: &R, candidate: &str) -> Result<bool> {
    let value = Value::Text(candidate.to_string());
    if record.is_new() {
        db::exists(conn, R::TABLE, "slug", &value)
    } else {
        let pk_value = record.value(R::PRIMARY_KEY);
        db::exists_other(conn, R::TABLE, "slug", &value, R::PRIMARY_KEY, &pk_value)
    }
}
