//! Order business logic - the order aggregate and its flat wire shape.
//!
//! An order is a header row in `orders` plus the `order_item` rows it owns. Every
//! mutation of the aggregate runs in one store transaction, so an order never
//! exists without its items and a failed item write leaves the previous item set
//! in place.
//!
//! Item updates replace the whole set. Status changes go through
//! [`update_order_status`] only and accept any of the five statuses regardless of
//! the current one.

use crate::{
    auth::Caller,
    entities::{
        Company, Medicine, Order, OrderItem, OrderStatus, User, company, medicine, order,
        order_item,
    },
    errors::{Error, Result},
    models::{OrderItemRequest, OrderRequest, UpdateStatusRequest, UserDetails},
};
use sea_orm::{LoaderTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

fn not_found(order_id: i64) -> Error {
    Error::NotFound {
        entity: "order",
        id: order_id,
    }
}

fn validate_items(items: &[OrderItemRequest]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::validation("An order needs at least one item"));
    }
    for item in items {
        if item.medicine_id == 0 || item.company_id == 0 {
            return Err(Error::validation(
                "Every item needs a medicine ID and a company ID",
            ));
        }
        if item.quantity <= 0 {
            return Err(Error::validation(format!(
                "Quantity for medicine {} must be positive, got {}",
                item.medicine_id, item.quantity
            )));
        }
    }
    Ok(())
}

async fn insert_items<C>(db: &C, order_id: i64, items: &[OrderItemRequest]) -> Result<()>
where
    C: ConnectionTrait,
{
    let rows = items.iter().map(|item| order_item::ActiveModel {
        order_id: Set(order_id),
        medicine_id: Set(item.medicine_id),
        company_id: Set(item.company_id),
        quantity: Set(item.quantity),
        ..Default::default()
    });

    OrderItem::insert_many(rows).exec(db).await?;
    Ok(())
}

async fn find_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| not_found(order_id))
}

/// Loads items, medicine and company names and (optionally) owners for `orders`
/// and flattens each into an [`OrderRequest`], preserving input order.
async fn assemble<C>(
    db: &C,
    orders: Vec<order::Model>,
    include_user_details: bool,
) -> Result<Vec<OrderRequest>>
where
    C: ConnectionTrait,
{
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let items = orders.load_many(OrderItem, db).await?;
    let owners = if include_user_details {
        orders.load_one(User, db).await?
    } else {
        vec![None; orders.len()]
    };

    let medicine_ids: BTreeSet<i64> = items.iter().flatten().map(|i| i.medicine_id).collect();
    let company_ids: BTreeSet<i64> = items.iter().flatten().map(|i| i.company_id).collect();

    let medicine_names: HashMap<i64, String> = Medicine::find()
        .filter(medicine::Column::Id.is_in(medicine_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    let company_names: HashMap<i64, String> = Company::find()
        .filter(company::Column::Id.is_in(company_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.company_name))
        .collect();

    let assembled = orders
        .into_iter()
        .zip(items)
        .zip(owners)
        .map(|((order, mut items), owner)| {
            items.sort_by_key(|item| item.id);
            OrderRequest {
                order_id: order.id,
                user_id: order.user_id,
                status: order.status,
                items: items
                    .into_iter()
                    .map(|item| OrderItemRequest {
                        medicine_id: item.medicine_id,
                        medicine_name: medicine_names.get(&item.medicine_id).cloned(),
                        company_id: item.company_id,
                        company_name: company_names.get(&item.company_id).cloned(),
                        quantity: item.quantity,
                    })
                    .collect(),
                user: owner.as_ref().map(UserDetails::from),
            }
        })
        .collect();

    Ok(assembled)
}

async fn assemble_one<C>(
    db: &C,
    order: order::Model,
    include_user_details: bool,
) -> Result<OrderRequest>
where
    C: ConnectionTrait,
{
    let order_id = order.id;
    assemble(db, vec![order], include_user_details)
        .await?
        .pop()
        .ok_or_else(|| not_found(order_id))
}

/// Places an order for `user_id` with the items in `request`.
///
/// `user_id` is the authenticated caller and overrides whatever `userId` the
/// payload carries. The new order starts as [`OrderStatus::Pending`].
///
/// # Errors
/// - [`Error::Validation`] if there are no items or an item is incomplete
/// - [`Error::Database`] if the store rejects the header or any item; nothing is kept
pub async fn create_order<C>(
    db: &C,
    user_id: i64,
    request: &OrderRequest,
    updated_by: &str,
) -> Result<OrderRequest>
where
    C: ConnectionTrait + TransactionTrait,
{
    validate_items(&request.items)?;
    if request.user_id != 0 && request.user_id != user_id {
        debug!(
            "Ignoring userId {} from payload, order belongs to caller {}",
            request.user_id, user_id
        );
    }

    let txn = db.begin().await?;

    let now = chrono::Utc::now();
    let order = order::ActiveModel {
        user_id: Set(user_id),
        status: Set(OrderStatus::Pending),
        updated_by: Set(updated_by.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    insert_items(&txn, order.id, &request.items).await?;

    txn.commit().await?;
    info!(
        "Created order {} for user {} with {} item(s)",
        order.id,
        user_id,
        request.items.len()
    );

    assemble_one(db, order, false).await
}

/// Retrieves one order. Owner details are attached only when
/// `include_user_details` is set.
pub async fn get_order_by_id<C>(
    db: &C,
    order_id: i64,
    include_user_details: bool,
) -> Result<OrderRequest>
where
    C: ConnectionTrait,
{
    let order = find_order(db, order_id).await?;
    assemble_one(db, order, include_user_details).await
}

/// Lists the orders visible to `caller`, ordered by id.
///
/// Regular callers see only their own orders. Admins see every order, each with
/// owner details attached.
pub async fn get_all_orders<C>(db: &C, caller: Caller) -> Result<Vec<OrderRequest>>
where
    C: ConnectionTrait,
{
    let mut query = Order::find().order_by_asc(order::Column::Id);
    if !caller.is_admin {
        query = query.filter(order::Column::UserId.eq(caller.user_id));
    }

    let orders = query.all(db).await?;
    assemble(db, orders, caller.is_admin).await
}

/// Replaces all items of an order and restamps the header.
///
/// The owner is reassigned to `request.user_id` unless it is 0. The status is
/// left unchanged.
///
/// # Errors
/// - [`Error::Validation`] if the new item set is empty or incomplete
/// - [`Error::NotFound`] if the order does not exist
/// - [`Error::Database`] if the store rejects a write; the previous items remain
pub async fn update_order<C>(
    db: &C,
    order_id: i64,
    request: &OrderRequest,
    updated_by: &str,
) -> Result<OrderRequest>
where
    C: ConnectionTrait + TransactionTrait,
{
    validate_items(&request.items)?;

    let txn = db.begin().await?;

    let mut order: order::ActiveModel = find_order(&txn, order_id).await?.into();

    let removed = OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    insert_items(&txn, order_id, &request.items).await?;

    if request.user_id != 0 {
        order.user_id = Set(request.user_id);
    }
    order.updated_by = Set(updated_by.to_string());
    order.updated_at = Set(chrono::Utc::now());
    let order = order.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Replaced {} item(s) of order {} with {}",
        removed.rows_affected,
        order_id,
        request.items.len()
    );

    assemble_one(db, order, false).await
}

/// Sets the status of an order.
///
/// The requested status is parsed before anything is read or written, so an
/// unknown value changes nothing.
///
/// # Errors
/// - [`Error::Validation`] if the status is not one of the five known values
/// - [`Error::NotFound`] if the order does not exist
pub async fn update_order_status<C>(
    db: &C,
    order_id: i64,
    request: &UpdateStatusRequest,
    updated_by: &str,
) -> Result<OrderRequest>
where
    C: ConnectionTrait,
{
    let status: OrderStatus = request.status.parse()?;

    let current = find_order(db, order_id).await?;
    let previous = current.status;

    let mut order: order::ActiveModel = current.into();
    order.status = Set(status);
    order.updated_by = Set(updated_by.to_string());
    order.updated_at = Set(chrono::Utc::now());
    let order = order.update(db).await?;

    info!("Order {} moved from {} to {}", order_id, previous, status);
    assemble_one(db, order, false).await
}

/// Deletes an order's items and then its header.
pub async fn delete_order<C>(db: &C, order_id: i64) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let order = find_order(&txn, order_id).await?;
    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    order.delete(&txn).await?;

    txn.commit().await?;
    info!("Deleted order {}", order_id);
    Ok(())
}
