use crate::config::IdConfig;
use crate::db;
use crate::error::{Error, Result};
use crate::models::{RandomIdRecord, Value};
use rand::Rng;
use rusqlite::Connection;

/// Lowercase letters and digits minus the look-alikes `l`, `o`, `0`, `1`.
pub const ID_ALPHABET: &[u8] = b"abcdefghijkmnpqrstuvwxyz23456789";
pub const ID_FIELD_LENGTH: usize = 24;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPolicy {
    pub length: usize,
    /// `None` retries until a free id turns up.
    pub max_attempts: Option<u32>,
}

impl Default for IdPolicy {
    fn default() -> Self {
        Self {
            length: ID_FIELD_LENGTH,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl From<&IdConfig> for IdPolicy {
    fn from(config: &IdConfig) -> Self {
        Self {
            length: config.length,
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
        }
    }
}

pub fn generate_random_id<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Persists `record`, assigning a fresh random id first if it has none.
///
/// The existence check for the accepted id and the insert share `conn`;
/// callers pass an IMMEDIATE transaction so no other writer can claim the id
/// in between. Records that already carry an id are updated, or inserted if
/// no row matched. On failure a freshly assigned id is taken back off the
/// record.
pub fn save_with_random_id<T, R>(
    conn: &Connection,
    record: &mut T,
    rng: &mut R,
    policy: &IdPolicy,
) -> Result<()>
where
    T: RandomIdRecord,
    R: Rng + ?Sized,
{
    if record.id().is_some_and(|id| !id.is_empty()) {
        if db::update_record(conn, record)? == 0 {
            db::insert_record(conn, record)?;
        }
        return Ok(());
    }

    let id = claim_random_id::<T, R>(conn, rng, policy)?;
    record.set_id(Some(id));

    if let Err(err) = db::insert_record(conn, record) {
        record.set_id(None);
        return Err(err);
    }

    tracing::debug!(table = T::TABLE, id = ?record.id(), "Inserted record with random id");
    Ok(())
}

fn claim_random_id<T, R>(conn: &Connection, rng: &mut R, policy: &IdPolicy) -> Result<String>
where
    T: RandomIdRecord,
    R: Rng + ?Sized,
{
    let mut attempts: u32 = 0;
    loop {
        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                tracing::warn!(table = T::TABLE, attempts, "Gave up looking for a free random id");
                return Err(Error::CapacityExhausted { attempts });
            }
        }
        attempts += 1;

        let candidate = generate_random_id(rng, policy.length);
        let taken = db::exists(
            conn,
            T::TABLE,
            T::PRIMARY_KEY,
            &Value::Text(candidate.clone()),
        )?;
        if !taken {
            return Ok(candidate);
        }
        tracing::debug!(table = T::TABLE, attempt = attempts, "Random id collision, regenerating");
    }
}
