use crate::error::Error;
use crate::models::Organization;
use crate::services::organization;
use crate::services::random_id::IdPolicy;
use crate::{Config, Database};
use anyhow::{Context, Result};
use std::path::Path;

use super::OrgCommand;

pub fn run(config_path: &Path, command: OrgCommand) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let db = Database::open(&config.database.path, config.database.pool_size)?;
    db.migrate()?;
    let policy = IdPolicy::from(&config.ids);

    match command {
        OrgCommand::Create {
            name,
            slug,
            description,
        } => {
            let org = organization::create(
                &db,
                &name,
                slug.as_deref(),
                description.as_deref(),
                &policy,
            )
            .map_err(report)?;
            tracing::info!("Organization '{}' created", org.name);
            print_org(&org);
        }
        OrgCommand::Update {
            slug,
            name,
            new_slug,
            description,
        } => {
            let mut org = organization::get_by_slug(&db, &slug)?
                .with_context(|| format!("Organization '{}' not found", slug))?;
            if let Some(name) = name {
                org.name = name;
            }
            if let Some(new_slug) = new_slug {
                org.slug = new_slug;
            }
            if let Some(description) = description {
                org.description = Some(description);
            }
            organization::save(&db, &mut org, &mut rand::thread_rng(), &policy)
                .map_err(report)?;
            print_org(&org);
        }
        OrgCommand::Show { slug } => {
            let org = organization::get_by_slug(&db, &slug)?
                .with_context(|| format!("Organization '{}' not found", slug))?;
            println!("{}", serde_json::to_string_pretty(&org)?);
        }
        OrgCommand::List { json } => {
            let orgs = organization::list(&db)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&orgs)?);
                return Ok(());
            }

            println!("{:<26} {:<52} {:<30}", "ID", "SLUG", "NAME");
            println!("{}", "-".repeat(108));
            for org in orgs {
                println!(
                    "{:<26} {:<52} {:<30}",
                    org.id.as_deref().unwrap_or("-"),
                    org.slug,
                    org.name
                );
            }
        }
    }

    Ok(())
}

fn print_org(org: &Organization) {
    println!(
        "{}\t{}\t{}",
        org.id.as_deref().unwrap_or("-"),
        org.slug,
        org.name
    );
}

/// Prints per-field validation messages before handing the error on.
fn report(err: Error) -> anyhow::Error {
    if let Error::Validation(ref errors) = err {
        for (field, messages) in errors.iter() {
            for message in messages {
                eprintln!("  {}: {}", field, message);
            }
        }
    }
    err.into()
}
