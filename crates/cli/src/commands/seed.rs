//! Seed the business tracker from a YAML file.
//!
//! The seed is idempotent: businesses are matched by name and existing rows
//! are left untouched, so re-running after adding entries is safe.

use chrono::NaiveDate;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{error, info};

use advice_for_life_core::BusinessStatus;
use advice_for_life_server::db::{self, BusinessRepository};
use advice_for_life_server::models::NewBusiness;

/// One business entry in the seed file.
#[derive(Debug, Deserialize)]
pub struct BusinessSeed {
    pub name: String,
    pub description: String,
    pub launch_date: NaiveDate,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Validate seed entries before touching the database.
fn validate(seeds: &[BusinessSeed]) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, seed) in seeds.iter().enumerate() {
        if seed.name.trim().is_empty() {
            errors.push(format!("entry {index}: name is empty"));
        }
        if seed.description.trim().is_empty() {
            errors.push(format!("entry {index}: description is empty"));
        }
        if let Some(status) = &seed.status
            && status.parse::<BusinessStatus>().is_err()
        {
            errors.push(format!("entry {index}: unknown status '{status}'"));
        }
    }
    errors
}

/// Seed businesses from a YAML file.
///
/// # Errors
///
/// Returns an error if the environment is missing, the file cannot be read
/// or parsed, or database operations fail.
pub async fn businesses(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("AFL_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "AFL_DATABASE_URL not set")?;

    info!(path = %file_path, "Loading business seed file");

    // Read and validate YAML before connecting to the database
    let content = tokio::fs::read_to_string(file_path).await?;
    let seeds: Vec<BusinessSeed> = serde_yaml::from_str(&content)?;

    info!(entries = seeds.len(), "Parsed seed file");

    let errors = validate(&seeds);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = BusinessRepository::new(&pool);
    let existing: Vec<String> = repo.list().await?.into_iter().map(|b| b.name).collect();

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for (index, seed) in seeds.into_iter().enumerate() {
        if existing.contains(&seed.name) {
            skipped += 1;
            continue;
        }

        let status = seed
            .status
            .as_deref()
            .map_or(Ok(BusinessStatus::Active), str::parse)
            .map_err(|e| format!("{e}"))?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let position = index as i32;

        repo.create(&NewBusiness {
            name: seed.name,
            description: seed.description,
            launch_date: seed.launch_date,
            website_link: seed.website_link,
            status,
            category: seed.category,
            milestone: seed.milestone,
            image_url: seed.image_url,
            position,
            created_by: None,
        })
        .await?;
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Businesses inserted: {inserted}");
    info!("  Businesses skipped (already exist): {skipped}");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_file() {
        let yaml = r"
- name: Advice for Life Publishing
  description: Self-publishing platform for raw, authentic life stories.
  launch_date: 2024-01-15
  status: active
  category: Publishing
  milestone: First book launched
- name: Phoenix Rising Consulting
  description: Coaching for people rebuilding from rock bottom.
  launch_date: 2024-02-20
";
        let seeds: Vec<BusinessSeed> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].category.as_deref(), Some("Publishing"));
        assert_eq!(seeds[1].status, None);
        assert!(validate(&seeds).is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let yaml = r"
- name: ''
  description: Something
  launch_date: 2024-01-15
  status: thriving
";
        let seeds: Vec<BusinessSeed> = serde_yaml::from_str(yaml).unwrap();
        let errors = validate(&seeds);
        assert_eq!(errors.len(), 2);
    }
}
