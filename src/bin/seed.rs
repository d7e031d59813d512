//! Populates the users table.
//!
//! ```text
//! seed admin                 # system administrator account
//! seed employees <csv-file>  # employeeId,name,email,... rows; header skipped
//! ```

use std::{env, fs, path::Path};

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use futures::future::join_all;
use log::{info, warn};
use sqlx::MySqlPool;

use office_portal::config::Config;
use office_portal::db::init_db;
use office_portal::model::role::Role;
use office_portal::utils::password::hash_password;

const ADMIN_EMPLOYEE_ID: &str = "ADMIN-001";
const ADMIN_NAME: &str = "System Admin";
const ADMIN_EMAIL_VAR: &str = "SEED_ADMIN_EMAIL";
const ADMIN_PASSWORD_VAR: &str = "SEED_ADMIN_PASSWORD";
const PLACEHOLDER_PASSWORD: &str = "placeholder_password";
const BATCH_SIZE: usize = 50;

#[derive(Debug, PartialEq)]
struct EmployeeRow {
    employee_id: String,
    name: String,
    email: String,
}

/// Parses the employee export. Blank lines and rows without a usable email are skipped.
fn parse_employees(csv: &str) -> Vec<EmployeeRow> {
    csv.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut cols = line.split(',');
            let employee_id = cols.next()?.trim();
            let name = cols.next()?.trim();
            let email = cols.next()?.trim();

            if !email.contains('@') {
                return None;
            }

            Some(EmployeeRow {
                employee_id: employee_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            })
        })
        .collect()
}

async fn upsert_user(
    pool: &MySqlPool,
    employee_id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    update_existing: bool,
) -> Result<()> {
    let on_conflict = if update_existing {
        "employee_id = VALUES(employee_id)"
    } else {
        "id = id"
    };

    let sql = format!(
        r#"
        INSERT INTO users (employee_id, name, email, password_hash, role, base_salary)
        VALUES (?, ?, ?, ?, ?, 0)
        ON DUPLICATE KEY UPDATE {}
        "#,
        on_conflict
    );

    sqlx::query(&sql)
        .bind(employee_id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role.to_string())
        .execute(pool)
        .await
        .with_context(|| format!("Failed to upsert {}", email))?;

    Ok(())
}

async fn seed_admin(pool: &MySqlPool) -> Result<()> {
    let email = env::var(ADMIN_EMAIL_VAR).with_context(|| format!("{} must be set", ADMIN_EMAIL_VAR))?;
    let password = env::var(ADMIN_PASSWORD_VAR).unwrap_or_else(|_| "admin".to_string());
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    upsert_user(pool, ADMIN_EMPLOYEE_ID, ADMIN_NAME, &email, &hash, Role::Admin, false).await?;
    info!("Admin {} seeded", email);
    Ok(())
}

async fn seed_employees(pool: &MySqlPool, csv_path: &Path) -> Result<()> {
    let data = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read {}", csv_path.display()))?;
    let employees = parse_employees(&data);
    info!("Importing {} employees from {}", employees.len(), csv_path.display());

    let hash = hash_password(PLACEHOLDER_PASSWORD)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let mut failed = 0usize;
    for batch in employees.chunks(BATCH_SIZE) {
        let results = join_all(batch.iter().map(|row| {
            upsert_user(pool, &row.employee_id, &row.name, &row.email, &hash, Role::Employee, true)
        }))
        .await;

        for (row, result) in batch.iter().zip(results) {
            match result {
                Ok(()) => info!("Imported [{}] {}", row.employee_id, row.name),
                Err(e) => {
                    failed += 1;
                    warn!("Skipped [{}] {}: {:#}", row.employee_id, row.name, e);
                }
            }
        }
    }

    info!("Employee import finished: {} ok, {} failed", employees.len() - failed, failed);
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env()?;
    let pool = init_db(&config.database_url).await?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["admin"] => seed_admin(&pool).await?,
        ["employees", csv] => seed_employees(&pool, Path::new(csv)).await?,
        _ => bail!("usage: seed admin | seed employees <csv-file>"),
    }

    pool.close().await;
    Ok(())
}
