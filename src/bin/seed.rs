//! Idempotent demo-data seeder.
//!
//! Creates demo staff accounts, patients with assigned wearables and a week
//! of randomized readings. Wearables that already have readings in the
//! seeded window are skipped, so the seeder can run repeatedly.

use anyhow::Context;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vida_en_mano::{config, db, session};

const DEMO_PASSWORD: &str = "123456";
const DAYS_BACK: i64 = 7;
const READINGS_PER_WEARABLE: usize = 28;
const PROB_CRITICAL: f64 = 0.08;
const PROB_NOT_WORN: f64 = 0.05;

const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("admin", "Administrador General", "admin"),
    ("enfermero1", "Enfermero de Turno", "nurse"),
];

const DEMO_PATIENTS: &[(&str, &str, &str, &str, i32)] = &[
    ("María", "García", "López", "1948-03-12", 101),
    ("José", "Hernández", "Martínez", "1952-11-30", 102),
    ("Carmen", "Rodríguez", "Sánchez", "1945-07-04", 103),
    ("Antonio", "Pérez", "Gómez", "1958-01-22", 104),
];

const COMMENTS: &[Option<&str>] = &[
    None,
    Some("Control rutinario"),
    Some("Paciente en reposo"),
    Some("Verificado por enfermería"),
    Some("Lectura manual"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load_config().context("failed to load configuration")?;
    let database = db::Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;
    let pool = database.pool();

    for (username, full_name, role) in DEMO_USERS {
        let hash = session::hash_password(DEMO_PASSWORD)?;
        sqlx::query(
            "INSERT INTO users (username, password_hash, full_name, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(*username)
        .bind(hash)
        .bind(*full_name)
        .bind(*role)
        .execute(pool)
        .await?;
    }
    info!("demo users ensured");

    for (first, paternal, maternal, born, wearable_id) in DEMO_PATIENTS {
        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM patients
             WHERE first_name = $1 AND paternal_surname = $2 AND maternal_surname = $3",
        )
        .bind(*first)
        .bind(*paternal)
        .bind(*maternal)
        .fetch_optional(pool)
        .await?;

        let patient_id = match existing {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, i32>(
                    "INSERT INTO patients (first_name, paternal_surname, maternal_surname, birth_date)
                     VALUES ($1, $2, $3, $4::date)
                     RETURNING id",
                )
                .bind(*first)
                .bind(*paternal)
                .bind(*maternal)
                .bind(*born)
                .fetch_one(pool)
                .await?
            }
        };

        sqlx::query(
            "INSERT INTO wearables (id, patient_id)
             VALUES ($1, $2)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(*wearable_id)
        .bind(patient_id)
        .execute(pool)
        .await?;
    }
    info!("demo patients and wearables ensured");

    let mut rng = StdRng::seed_from_u64(12345);
    let now = Utc::now();
    let window_start = now - Duration::days(DAYS_BACK);
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    let wearables =
        sqlx::query_scalar::<_, i32>("SELECT id FROM wearables ORDER BY id")
            .fetch_all(pool)
            .await?;

    for wearable_id in wearables {
        let recent = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM readings WHERE wearable_id = $1 AND recorded_at >= $2 LIMIT 1",
        )
        .bind(wearable_id)
        .bind(window_start)
        .fetch_optional(pool)
        .await?;
        if recent.is_some() {
            skipped += 1;
            continue;
        }

        for step in 0..READINGS_PER_WEARABLE {
            let frac = step as f64 / (READINGS_PER_WEARABLE - 1) as f64;
            let offset = Duration::seconds(
                (frac * Duration::days(DAYS_BACK).num_seconds() as f64) as i64,
            );
            let recorded_at = window_start + offset;

            let (heart_rate, temperature_c, worn) = if rng.gen_bool(PROB_NOT_WORN) {
                (None, None, Some(false))
            } else if rng.gen_bool(PROB_CRITICAL) {
                let temp = if rng.gen_bool(0.5) {
                    rng.gen_range(39.6..41.0)
                } else {
                    rng.gen_range(33.5..34.9)
                };
                let rate = if rng.gen_bool(0.5) {
                    rng.gen_range(131..180)
                } else {
                    rng.gen_range(20..40)
                };
                (Some(rate), Some(round1(temp)), Some(true))
            } else {
                (
                    Some(rng.gen_range(55..100)),
                    Some(round1(rng.gen_range(36.0..37.8))),
                    Some(true),
                )
            };

            let comment = COMMENTS[rng.gen_range(0..COMMENTS.len())];

            sqlx::query(
                "INSERT INTO readings (wearable_id, heart_rate, temperature_c, worn, comment, recorded_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(wearable_id)
            .bind(heart_rate)
            .bind(temperature_c)
            .bind(worn)
            .bind(comment)
            .bind(recorded_at)
            .execute(pool)
            .await?;
            inserted += 1;
        }
    }

    info!(inserted, skipped, "seed completed");
    Ok(())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
