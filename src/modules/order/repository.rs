use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use std::str::FromStr;
use ulid::Ulid;

use crate::modules::{
    location::{self, repository::Location},
    menu::repository::{self as menu, Ingredient, MenuItem},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "RECEIVED")]
    Received,
    #[serde(rename = "PREPARING")]
    Preparing,
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "COLLECTED")]
    Collected,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl ToString for OrderStatus {
    fn to_string(&self) -> String {
        match self {
            OrderStatus::Received => String::from("RECEIVED"),
            OrderStatus::Preparing => String::from("PREPARING"),
            OrderStatus::Ready => String::from("READY"),
            OrderStatus::Collected => String::from("COLLECTED"),
            OrderStatus::Cancelled => String::from("CANCELLED"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(OrderStatus::Received),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "READY" => Ok(OrderStatus::Ready),
            "COLLECTED" => Ok(OrderStatus::Collected),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("'{}' is not a valid OrderStatus", s)),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Delivery state of the order confirmation email.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ConfirmationStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "SENT")]
    Sent,
    #[serde(rename = "FAILED")]
    Failed,
}

impl ToString for ConfirmationStatus {
    fn to_string(&self) -> String {
        match self {
            ConfirmationStatus::Pending => String::from("PENDING"),
            ConfirmationStatus::Sent => String::from("SENT"),
            ConfirmationStatus::Failed => String::from("FAILED"),
        }
    }
}

impl FromStr for ConfirmationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ConfirmationStatus::Pending),
            "SENT" => Ok(ConfirmationStatus::Sent),
            "FAILED" => Ok(ConfirmationStatus::Failed),
            _ => Err(format!("'{}' is not a valid ConfirmationStatus", s)),
        }
    }
}

impl TryFrom<String> for ConfirmationStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Serialize, Clone, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub location_id: i32,
    pub order_time: NaiveDateTime,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub pickup_time: NaiveDateTime,
    pub stripe_session_id: String,
    pub total_price: BigDecimal,
    #[sqlx(try_from = "String")]
    pub confirmation_status: ConfirmationStatus,
    pub confirmation_attempts: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Clone, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub base_price: BigDecimal,
    pub total_price: BigDecimal,
    pub position: i32,
}

#[derive(Serialize, Clone, Debug, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemIngredient {
    pub id: String,
    pub order_item_id: String,
    pub ingredient_id: i32,
    pub price: BigDecimal,
    pub extra: bool,
    pub removed: bool,
    pub position: i32,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FullOrderItemIngredient {
    #[serde(flatten)]
    pub modification: OrderItemIngredient,
    pub ingredient: Ingredient,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FullOrderItem {
    #[serde(flatten)]
    pub item: OrderItem,
    pub menu_item: MenuItem,
    pub modifications: Vec<FullOrderItemIngredient>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FullOrder {
    #[serde(flatten)]
    pub order: Order,
    pub location: Location,
    pub items: Vec<FullOrderItem>,
}

pub struct CreateOrderItemIngredientPayload {
    pub ingredient_id: i32,
    pub price: BigDecimal,
    pub extra: bool,
    pub removed: bool,
}

pub struct CreateOrderItemPayload {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub base_price: BigDecimal,
    pub unit_price: BigDecimal,
    pub modifications: Vec<CreateOrderItemIngredientPayload>,
}

pub struct CreateOrderPayload {
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub location_id: i32,
    pub pickup_time: NaiveDateTime,
    pub stripe_session_id: String,
    pub total_price: BigDecimal,
    pub items: Vec<CreateOrderItemPayload>,
}

pub struct NewOrder {
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub location_id: i32,
    pub order_time: NaiveDateTime,
    pub status: OrderStatus,
    pub pickup_time: NaiveDateTime,
    pub stripe_session_id: String,
    pub total_price: BigDecimal,
}

pub struct NewOrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub base_price: BigDecimal,
    pub total_price: BigDecimal,
    pub position: i32,
}

pub struct NewOrderItemIngredient {
    pub id: String,
    pub order_item_id: String,
    pub ingredient_id: i32,
    pub price: BigDecimal,
    pub extra: bool,
    pub removed: bool,
    pub position: i32,
}

/// Every row a checkout produces, with identifiers assigned up front so the
/// whole graph can be written in one round of inserts.
pub struct NewOrderGraph {
    pub order: NewOrder,
    pub items: Vec<NewOrderItem>,
    pub ingredients: Vec<NewOrderItemIngredient>,
}

impl NewOrderGraph {
    pub fn build(payload: CreateOrderPayload, order_time: NaiveDateTime) -> Self {
        let order_id = Ulid::new().to_string();
        let mut items = vec![];
        let mut ingredients = vec![];

        for (item_position, item) in payload.items.into_iter().enumerate() {
            let order_item_id = Ulid::new().to_string();

            for (position, modification) in item.modifications.into_iter().enumerate() {
                ingredients.push(NewOrderItemIngredient {
                    id: Ulid::new().to_string(),
                    order_item_id: order_item_id.clone(),
                    ingredient_id: modification.ingredient_id,
                    price: modification.price,
                    extra: modification.extra,
                    removed: modification.removed,
                    position: position as i32,
                });
            }

            items.push(NewOrderItem {
                id: order_item_id,
                order_id: order_id.clone(),
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                total_price: &item.unit_price * &BigDecimal::from(item.quantity),
                base_price: item.base_price,
                position: item_position as i32,
            });
        }

        Self {
            order: NewOrder {
                id: order_id,
                customer_name: payload.customer_name,
                phone_number: payload.phone_number,
                email: payload.email,
                location_id: payload.location_id,
                order_time,
                status: OrderStatus::Received,
                pickup_time: payload.pickup_time,
                stripe_session_id: payload.stripe_session_id,
                total_price: payload.total_price,
            },
            items,
            ingredients,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    DuplicateSession,
    UnexpectedError,
}

fn map_insert_error(err: sqlx::Error, what: &str) -> Error {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => Error::DuplicateSession,
        _ => {
            tracing::error!("Error occurred while trying to create {}: {}", what, err);
            Error::UnexpectedError
        }
    }
}

/// Writes the order, its items and their modifications. Callers run this
/// inside a transaction so a failure part way leaves nothing behind.
pub async fn create(conn: &mut PgConnection, graph: NewOrderGraph) -> Result<Order, Error> {
    let order = sqlx::query_as::<_, Order>(
        "
        INSERT INTO orders (
            id,
            customer_name,
            phone_number,
            email,
            location_id,
            order_time,
            status,
            pickup_time,
            stripe_session_id,
            total_price
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        ",
    )
    .bind(graph.order.id)
    .bind(graph.order.customer_name)
    .bind(graph.order.phone_number)
    .bind(graph.order.email)
    .bind(graph.order.location_id)
    .bind(graph.order.order_time)
    .bind(graph.order.status.to_string())
    .bind(graph.order.pickup_time)
    .bind(graph.order.stripe_session_id)
    .bind(graph.order.total_price)
    .fetch_one(&mut *conn)
    .await
    .map_err(|err| map_insert_error(err, "an order"))?;

    if !graph.items.is_empty() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO order_items (id, order_id, menu_item_id, quantity, base_price, total_price, position) ",
        );
        builder.push_values(graph.items, |mut b, item| {
            b.push_bind(item.id)
                .push_bind(item.order_id)
                .push_bind(item.menu_item_id)
                .push_bind(item.quantity)
                .push_bind(item.base_price)
                .push_bind(item.total_price)
                .push_bind(item.position);
        });
        builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|err| map_insert_error(err, "order items"))?;
    }

    if !graph.ingredients.is_empty() {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO order_item_ingredients (id, order_item_id, ingredient_id, price, extra, removed, position) ",
        );
        builder.push_values(graph.ingredients, |mut b, ingredient| {
            b.push_bind(ingredient.id)
                .push_bind(ingredient.order_item_id)
                .push_bind(ingredient.ingredient_id)
                .push_bind(ingredient.price)
                .push_bind(ingredient.extra)
                .push_bind(ingredient.removed)
                .push_bind(ingredient.position);
        });
        builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(|err| map_insert_error(err, "order item ingredients"))?;
    }

    Ok(order)
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<Order>, Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch order by id: {}", err);
            Error::UnexpectedError
        })
}

pub async fn find_by_session_id<'e, E: PgExecutor<'e>>(
    e: E,
    session_id: String,
) -> Result<Option<Order>, Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE stripe_session_id = $1")
        .bind(session_id)
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!(
                "Error occurred while trying to fetch order by session id: {}",
                err
            );
            Error::UnexpectedError
        })
}

async fn find_items_by_order_id<'e, E: PgExecutor<'e>>(
    e: E,
    order_id: String,
) -> Result<Vec<OrderItem>, Error> {
    sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = $1 ORDER BY position ASC",
    )
    .bind(order_id)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while trying to fetch order items: {}", err);
        Error::UnexpectedError
    })
}

async fn find_ingredients_by_order_item_ids<'e, E: PgExecutor<'e>>(
    e: E,
    order_item_ids: Vec<String>,
) -> Result<Vec<OrderItemIngredient>, Error> {
    sqlx::query_as::<_, OrderItemIngredient>(
        "
        SELECT * FROM order_item_ingredients
        WHERE order_item_id = ANY($1)
        ORDER BY order_item_id ASC, position ASC
        ",
    )
    .bind(order_item_ids)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to fetch order item ingredients: {}",
            err
        );
        Error::UnexpectedError
    })
}

/// Stitches the rows of one order back into a tree. Rows whose catalog
/// entry is missing make the whole graph invalid.
pub fn assemble_full_order(
    order: Order,
    location: Location,
    items: Vec<OrderItem>,
    modifications: Vec<OrderItemIngredient>,
    menu_items: Vec<MenuItem>,
    ingredients: Vec<Ingredient>,
) -> Option<FullOrder> {
    let menu_items = menu_items
        .into_iter()
        .map(|menu_item| (menu_item.id, menu_item))
        .collect::<HashMap<_, _>>();
    let ingredients = ingredients
        .into_iter()
        .map(|ingredient| (ingredient.id, ingredient))
        .collect::<HashMap<_, _>>();
    let mut modifications = modifications
        .into_iter()
        .sorted_by_key(|modification| modification.position)
        .into_group_map_by(|modification| modification.order_item_id.clone());

    let items = items
        .into_iter()
        .sorted_by_key(|item| item.position)
        .map(|item| {
            let menu_item = menu_items.get(&item.menu_item_id)?.clone();
            let modifications = modifications
                .remove(&item.id)
                .unwrap_or_default()
                .into_iter()
                .map(|modification| {
                    ingredients
                        .get(&modification.ingredient_id)
                        .cloned()
                        .map(|ingredient| FullOrderItemIngredient {
                            modification,
                            ingredient,
                        })
                })
                .collect::<Option<Vec<_>>>()?;

            Some(FullOrderItem {
                item,
                menu_item,
                modifications,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(FullOrder {
        order,
        location,
        items,
    })
}

pub async fn find_full_order_by_id(pool: &PgPool, id: String) -> Result<Option<FullOrder>, Error> {
    let order = match find_by_id(pool, id.clone()).await? {
        Some(order) => order,
        None => return Ok(None),
    };

    let location = location::repository::find_by_id(pool, order.location_id)
        .await
        .map_err(|_| Error::UnexpectedError)?
        .ok_or_else(|| {
            tracing::error!("Order {} references a missing location", id);
            Error::UnexpectedError
        })?;

    let items = find_items_by_order_id(pool, id.clone()).await?;
    let modifications = find_ingredients_by_order_item_ids(
        pool,
        items.iter().map(|item| item.id.clone()).collect(),
    )
    .await?;

    let menu_items = menu::find_menu_items_by_ids(
        pool,
        items.iter().map(|item| item.menu_item_id).unique().collect(),
    )
    .await
    .map_err(|_| Error::UnexpectedError)?;
    let ingredients = menu::find_ingredients_by_ids(
        pool,
        modifications
            .iter()
            .map(|modification| modification.ingredient_id)
            .unique()
            .collect(),
    )
    .await
    .map_err(|_| Error::UnexpectedError)?;

    assemble_full_order(order, location, items, modifications, menu_items, ingredients)
        .map(Some)
        .ok_or_else(|| {
            tracing::error!("Order {} references missing catalog entries", id);
            Error::UnexpectedError
        })
}

pub async fn record_confirmation<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    status: ConfirmationStatus,
) -> Result<(), Error> {
    sqlx::query(
        "
        UPDATE orders
        SET
            confirmation_status = $2,
            confirmation_attempts = confirmation_attempts + 1,
            updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(status.to_string())
    .execute(e)
    .await
    .map(|_| ())
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to record order confirmation: {}",
            err
        );
        Error::UnexpectedError
    })
}

/// Orders whose confirmation failed, plus ones still `PENDING` long after
/// they were saved (the process stopped before the email went out).
pub async fn find_ids_awaiting_confirmation<'e, E: PgExecutor<'e>>(
    e: E,
    max_attempts: i32,
    pending_grace_minutes: i32,
) -> Result<Vec<String>, Error> {
    sqlx::query_scalar::<_, String>(
        "
        SELECT id FROM orders
        WHERE confirmation_attempts < $3
            AND (
                confirmation_status = $1
                OR (
                    confirmation_status = $2
                    AND created_at < LOCALTIMESTAMP - make_interval(mins => $4)
                )
            )
        ORDER BY created_at ASC
        ",
    )
    .bind(ConfirmationStatus::Failed.to_string())
    .bind(ConfirmationStatus::Pending.to_string())
    .bind(max_attempts)
    .bind(pending_grace_minutes)
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to fetch orders awaiting confirmation: {}",
            err
        );
        Error::UnexpectedError
    })
}
