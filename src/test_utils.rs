pub mod test_helpers {
    use crate::{config::AppConfig, AppState};
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when you need several connections to see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// A 1x1 PNG, enough to pass avatar image detection
    pub fn sample_png() -> Result<Vec<u8>, image::ImageError> {
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([29, 161, 242]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        let now = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind("avatars/test.png")
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a tweet with an explicit timestamp
    pub async fn insert_test_tweet(
        pool: &SqlitePool,
        user_id: i64,
        text: &str,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO tweets (user_id, text, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(text)
        .bind(created_at)
        .bind(created_at)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Application state over `pool` with avatars stored under `storage_dir`
    pub fn build_test_state(pool: SqlitePool, storage_dir: &Path) -> (AppState, AppConfig) {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            storage_dir: storage_dir.to_path_buf(),
            ..AppConfig::default()
        };
        (AppState::new(pool, &config), config)
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

#[cfg(test)]
pub async fn create_test_user(pool: &sqlx::SqlitePool, email: &str) -> i64 {
    match test_helpers::insert_test_user(pool, "Test User", email, "password123").await {
        Ok(id) => id,
        Err(e) => panic!("Failed to create test user: {}", e),
    }
}
