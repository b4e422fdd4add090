//! SQLite recipe store (embedded, no external dependencies)

use async_trait::async_trait;
use recipe_core::ports::RecipeStore;
use recipe_core::{Difficulty, Recipe, RecipeDraft, RecipeError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
}

fn storage_error(e: sqlx::Error) -> RecipeError {
    RecipeError::Storage(e.to_string())
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tracing::info!("Creating parent directory: {}", parent.display());
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    RecipeError::Storage(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database, one connection so every query sees the same data
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(storage_error)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, creating schema...");
        Self::run_migrations(&pool).await?;
        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                ingredients TEXT NOT NULL,
                steps TEXT NOT NULL,
                prep_time TEXT NOT NULL,
                cook_time TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                cuisine TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

#[async_trait]
impl RecipeStore for Database {
    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let rows: Vec<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, title, ingredients, steps, prep_time, cook_time, difficulty, cuisine
            FROM recipes ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter().map(Recipe::try_from).collect()
    }

    async fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
        let row: Option<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, title, ingredients, steps, prep_time, cook_time, difficulty, cuisine
            FROM recipes WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(storage_error)?;

        row.map(Recipe::try_from).transpose()
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        // instr() rather than LIKE so % and _ in the query match literally
        let rows: Vec<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, title, ingredients, steps, prep_time, cook_time, difficulty, cuisine
            FROM recipes WHERE instr(LOWER(title), LOWER(?1)) > 0
            ORDER BY id
            "#,
        )
        .bind(query)
        .fetch_all(&*self.pool)
        .await
        .map_err(storage_error)?;

        rows.into_iter().map(Recipe::try_from).collect()
    }

    async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe> {
        let result = sqlx::query(
            r#"
            INSERT INTO recipes (title, ingredients, steps, prep_time, cook_time, difficulty, cuisine)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&draft.title)
        .bind(serde_json::to_string(&draft.ingredients)?)
        .bind(serde_json::to_string(&draft.steps)?)
        .bind(&draft.prep_time)
        .bind(&draft.cook_time)
        .bind(draft.difficulty.as_str())
        .bind(&draft.cuisine)
        .execute(&*self.pool)
        .await
        .map_err(storage_error)?;

        Ok(Recipe::from_draft(result.last_insert_rowid(), draft))
    }

    async fn update_recipe(&self, id: i64, draft: RecipeDraft) -> Result<Option<Recipe>> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET title = ?1, ingredients = ?2, steps = ?3, prep_time = ?4,
                cook_time = ?5, difficulty = ?6, cuisine = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&draft.title)
        .bind(serde_json::to_string(&draft.ingredients)?)
        .bind(serde_json::to_string(&draft.steps)?)
        .bind(&draft.prep_time)
        .bind(&draft.cook_time)
        .bind(draft.difficulty.as_str())
        .bind(&draft.cuisine)
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(Recipe::from_draft(id, draft)))
    }

    async fn delete_recipe(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipes WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: i64,
    title: String,
    ingredients: String,
    steps: String,
    prep_time: String,
    cook_time: String,
    difficulty: String,
    cuisine: String,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = RecipeError;

    fn try_from(r: RecipeRow) -> Result<Self> {
        let difficulty = Difficulty::from_str(&r.difficulty).map_err(RecipeError::Storage)?;

        Ok(Recipe::from_draft(
            r.id,
            RecipeDraft {
                title: r.title,
                ingredients: serde_json::from_str(&r.ingredients)?,
                steps: serde_json::from_str(&r.steps)?,
                prep_time: r.prep_time,
                cook_time: r.cook_time,
                difficulty,
                cuisine: r.cuisine,
            },
        ))
    }
}
