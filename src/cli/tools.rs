use crate::services::random_id::{generate_random_id, IdPolicy};
use crate::services::slug::generate_slug;
use crate::Config;
use anyhow::Result;
use std::path::Path;

pub fn slugify(name: &str, max_length: usize) -> Result<()> {
    if max_length < 2 {
        anyhow::bail!("--max-length must be at least 2");
    }
    println!("{}", generate_slug(name, max_length));
    Ok(())
}

pub fn new_id(config_path: &Path, count: usize) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let policy = IdPolicy::from(&config.ids);
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        println!("{}", generate_random_id(&mut rng, policy.length));
    }
    Ok(())
}
