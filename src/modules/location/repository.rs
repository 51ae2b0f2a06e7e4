use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use sqlx::{FromRow, PgExecutor};

#[derive(Serialize, Clone, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub phone_number: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub id: i32,
    pub location_id: i32,
    /// 0 is Monday, 6 is Sunday.
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LocationWithOpeningHours {
    #[serde(flatten)]
    pub location: Location,
    pub opening_hours: Vec<OpeningHours>,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

pub async fn find_active<'e, E: PgExecutor<'e>>(e: E) -> Result<Vec<Location>, Error> {
    sqlx::query_as::<_, Location>(
        "
        SELECT * FROM locations
        WHERE is_active = TRUE
        ORDER BY name ASC
        ",
    )
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch active locations: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: i32) -> Result<Option<Location>, Error> {
    sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch location by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_active_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: i32,
) -> Result<Option<Location>, Error> {
    sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1 AND is_active = TRUE")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while trying to fetch active location by id: {}",
                err
            );
            Error::UnexpectedError
        })
}

pub async fn find_opening_hours_by_location_id<'e, E: PgExecutor<'e>>(
    e: E,
    location_id: i32,
) -> Result<Vec<OpeningHours>, Error> {
    sqlx::query_as::<_, OpeningHours>(
        "
        SELECT * FROM location_opening_hours
        WHERE location_id = $1
        ORDER BY day_of_week ASC
        ",
    )
    .bind(location_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to fetch opening hours for location {}: {}",
            location_id,
            err
        );
        Error::UnexpectedError
    })
}
