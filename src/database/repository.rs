use sqlx::sqlite::SqlitePool;
use thiserror::Error;

use crate::database::models::{Drink, DrinkChanges, DrinkRow, Ingredient, NewDrink};

/// Outcome of a failed storage operation on drinks
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Drink {0} not found")]
    NotFound(i64),

    #[error("A drink titled '{0}' already exists")]
    Conflict(String),

    #[error("Stored recipe for drink {id} is not valid JSON: {source}")]
    CorruptRecipe {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode recipe: {0}")]
    Encode(serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Storage handle for the `drink` table. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct DrinkRepository {
    pool: SqlitePool,
}

impl DrinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All drinks in insertion order
    pub async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drink ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(decode_row).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Drink, StoreError> {
        let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        decode_row(row)
    }

    pub async fn insert(&self, new: &NewDrink) -> Result<Drink, StoreError> {
        let recipe = encode_recipe(&new.recipe)?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind(&new.title)
            .bind(&recipe)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, &new.title))?;

        tx.commit().await?;

        Ok(Drink {
            id: result.last_insert_rowid(),
            title: new.title.clone(),
            recipe: new.recipe.clone(),
        })
    }

    /// Overwrite the provided fields of drink `id`
    pub async fn update(&self, id: i64, changes: &DrinkChanges) -> Result<Drink, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        let mut drink = decode_row(row)?;
        changes.apply(&mut drink);
        let recipe = encode_recipe(&drink.recipe)?;

        sqlx::query("UPDATE drink SET title = ?, recipe = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(&recipe)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, &drink.title))?;

        tx.commit().await?;
        Ok(drink)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM drink WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;
        Ok(())
    }
}

fn decode_row(row: DrinkRow) -> Result<Drink, StoreError> {
    let id = row.id;
    Drink::try_from(row).map_err(|source| StoreError::CorruptRecipe { id, source })
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, StoreError> {
    serde_json::to_string(recipe).map_err(StoreError::Encode)
}

fn write_error(err: sqlx::Error, title: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(title.to_string()),
        _ => StoreError::Sqlx(err),
    }
}
