//! SQLite-backed order repository.
//!
//! All database operations run in `spawn_blocking` to avoid blocking the
//! async runtime.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, AppError, Result};
use crate::models::{NewOrder, Order, OrderStatus};

const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_email, product_id, \
     product_token_id, quantity, total_amount, status, reddio_payment_id, reddio_pay_link, \
     reddio_status, transaction_hash, created_at, updated_at, paid_at";

/// Order persistence.
#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<DbManager>,
}

impl OrderRepository {
    /// Repository over the shared pool.
    #[must_use]
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a `pending` order and return it with its assigned id.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn insert(&self, new_order: NewOrder) -> Result<Order> {
        self.with_conn(move |conn| insert_order(conn, &new_order, Utc::now())).await
    }

    /// Order with primary key `id`, if any.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        self.with_conn(move |conn| query_order(conn, "id = ?1", &id)).await
    }

    /// Order with the given `ORD…` number, if any.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn find_by_number(&self, order_number: &str) -> Result<Option<Order>> {
        let order_number = order_number.to_string();
        self.with_conn(move |conn| query_order(conn, "order_number = ?1", &order_number)).await
    }

    /// One page of orders, newest first, plus the total matching count.
    ///
    /// `page` is 1-based.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
        status: Option<String>,
    ) -> Result<(Vec<Order>, i64)> {
        self.with_conn(move |conn| query_page(conn, page, limit, status.as_deref())).await
    }

    /// Mark an order whose payment could not be created.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn mark_failed(&self, id: i64) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![OrderStatus::Failed.as_str(), Utc::now(), id],
            )?;
            Ok(())
        })
        .await
    }

    /// Record the remote payment created for an order.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn attach_payment(
        &self,
        id: i64,
        payment_id: String,
        pay_link: String,
        reddio_status: String,
    ) -> Result<DateTime<Utc>> {
        self.with_conn(move |conn| {
            let now = Utc::now();
            conn.execute(
                "UPDATE orders SET reddio_payment_id = ?1, reddio_pay_link = ?2, \
                 reddio_status = ?3, updated_at = ?4 WHERE id = ?5",
                params![payment_id, pay_link, reddio_status, now, id],
            )?;
            Ok(now)
        })
        .await
    }

    /// Transition an order to `paid`.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn mark_paid(
        &self,
        id: i64,
        reddio_status: String,
        transaction_hash: String,
        paid_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE orders SET status = ?1, reddio_status = ?2, transaction_hash = ?3, \
                 paid_at = ?4, updated_at = ?4 WHERE id = ?5",
                params![OrderStatus::Paid.as_str(), reddio_status, transaction_hash, paid_at, id],
            )?;
            Ok(())
        })
        .await
    }

    /// Update only the mirrored remote status.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query or the pool fails.
    pub async fn update_reddio_status(&self, id: i64, reddio_status: String) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE orders SET reddio_status = ?1, updated_at = ?2 WHERE id = ?3",
                params![reddio_status, Utc::now(), id],
            )?;
            Ok(())
        })
        .await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            f(&conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn insert_order(conn: &Connection, new_order: &NewOrder, now: DateTime<Utc>) -> Result<Order> {
    conn.execute(
        "INSERT INTO orders (order_number, customer_name, customer_email, product_id, \
         product_token_id, quantity, total_amount, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            new_order.order_number,
            new_order.customer_name,
            new_order.customer_email,
            new_order.product_id,
            new_order.product_token_id,
            new_order.quantity,
            new_order.total_amount,
            OrderStatus::Pending.as_str(),
            now,
        ],
    )?;

    Ok(Order {
        id: conn.last_insert_rowid(),
        order_number: new_order.order_number.clone(),
        customer_name: new_order.customer_name.clone(),
        customer_email: new_order.customer_email.clone(),
        product_id: new_order.product_id.clone(),
        product_token_id: new_order.product_token_id.clone(),
        quantity: new_order.quantity,
        total_amount: new_order.total_amount.clone(),
        status: OrderStatus::Pending,
        reddio_payment_id: String::new(),
        reddio_pay_link: String::new(),
        reddio_status: String::new(),
        transaction_hash: String::new(),
        created_at: now,
        updated_at: now,
        paid_at: None,
    })
}

fn query_order(
    conn: &Connection,
    predicate: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE {predicate}");
    let row = conn.query_row(&sql, [value], map_order_row).optional()?;
    row.transpose()
}

fn query_page(
    conn: &Connection,
    page: u32,
    limit: u32,
    status: Option<&str>,
) -> Result<(Vec<Order>, i64)> {
    let (where_clause, filter): (&str, Vec<&str>) = match status {
        Some(status) if !status.is_empty() => ("WHERE status = ?1", vec![status]),
        _ => ("", Vec::new()),
    };

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM orders {where_clause}"),
        params_from_iter(filter.iter()),
        |row| row.get(0),
    )?;

    let offset = i64::from(page.max(1) - 1) * i64::from(limit);
    let next = filter.len() + 1;
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders {where_clause} \
         ORDER BY created_at DESC, id DESC LIMIT ?{next} OFFSET ?{}",
        next + 1
    );

    let mut args: Vec<Box<dyn rusqlite::ToSql>> =
        filter.iter().map(|s| Box::new(s.to_string()) as Box<dyn rusqlite::ToSql>).collect();
    args.push(Box::new(i64::from(limit)));
    args.push(Box::new(offset));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_order_row)?;

    let mut orders = Vec::new();
    for row in rows {
        orders.push(row??);
    }
    Ok((orders, total))
}

/// Row mapper. The inner `Result` carries a status that failed to parse.
fn map_order_row(row: &Row<'_>) -> rusqlite::Result<Result<Order>> {
    let status: String = row.get(8)?;
    let status = match status.parse::<OrderStatus>() {
        Ok(status) => status,
        Err(e) => return Ok(Err(AppError::Database(e))),
    };

    Ok(Ok(Order {
        id: row.get(0)?,
        order_number: row.get(1)?,
        customer_name: row.get(2)?,
        customer_email: row.get(3)?,
        product_id: row.get(4)?,
        product_token_id: row.get(5)?,
        quantity: row.get(6)?,
        total_amount: row.get(7)?,
        status,
        reddio_payment_id: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        reddio_pay_link: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        reddio_status: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        transaction_hash: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
        paid_at: row.get(15)?,
    }))
}

// ============================================================================
// Tests
// ============================================================================
