use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::BigDecimal;
use sqlx::{FromRow, PgExecutor};

#[derive(Serialize, Clone, Debug, FromRow)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub base_price: BigDecimal,
    pub is_available: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug, FromRow)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub price: BigDecimal,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub async fn find_menu_items_by_ids<'e, E: PgExecutor<'e>>(
    e: E,
    ids: Vec<i32>,
) -> Result<Vec<MenuItem>, Error> {
    sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch menu items: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_ingredients_by_ids<'e, E: PgExecutor<'e>>(
    e: E,
    ids: Vec<i32>,
) -> Result<Vec<Ingredient>, Error> {
    sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch ingredients: {}", err);
            Error::UnexpectedError
        })
}
