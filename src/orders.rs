use chrono::Datelike;
use chrono_tz::Tz;
use std::sync::Arc;
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::clock::Clock;
use crate::db::{Collection, Store, StoreExt};
use crate::error::{AppError, AppResult};
use crate::models::{NewOrder, Order, OrderItem, OrderStats, OrderStatus, User};
use crate::settings::SettingsStore;

/// Order submission, history and status changes over the `orders` collection.
#[derive(Clone)]
pub struct OrderWorkflow {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    catalog: ProductCatalog,
    settings: SettingsStore,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: ProductCatalog::new(store.clone(), clock.clone()),
            settings: SettingsStore::new(store.clone()),
            store,
            clock,
        }
    }

    /// Snapshots name, unit and price of every requested product and stores a
    /// `pending` order. Zero-quantity lines are dropped.
    pub fn submit(&self, order: NewOrder) -> AppResult<Order> {
        let products = self.catalog.list()?;

        let mut items = Vec::new();
        for line in order.lines.iter().filter(|l| l.quantity > 0) {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| AppError::not_found("product", line.product_id))?;

            items.push(OrderItem {
                name: product.name.clone(),
                quantity: line.quantity,
                unit: product.unit.clone(),
                price: product.price,
            });
        }

        if items.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        let supplier_email = match non_blank(order.supplier_email) {
            Some(email) => email,
            None => self.settings.get()?.default_supplier_email,
        };

        let order = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            user_name: order.user_name,
            created_at: self.clock.now(),
            total: Order::items_total(&items),
            items,
            status: OrderStatus::Pending,
            supplier_email,
            notes: non_blank(order.notes),
        };

        // Newest first
        let mut orders: Vec<Order> = self.store.load(Collection::Orders)?;
        orders.insert(0, order.clone());
        self.store.save(Collection::Orders, &orders)?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = order.items.len(),
            total = order.total,
            "Order submitted"
        );
        Ok(order)
    }

    /// Moves an order to any status. Role checks happen at the caller boundary.
    pub fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let mut orders: Vec<Order> = self.store.load(Collection::Orders)?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::not_found("order", id))?;
        let previous = order.status;
        order.status = status;
        let order = order.clone();

        self.store.save(Collection::Orders, &orders)?;

        tracing::info!(order_id = %id, ?previous, ?status, "Order status changed");
        Ok(order)
    }

    pub fn get(&self, id: Uuid) -> AppResult<Order> {
        let orders: Vec<Order> = self.store.load(Collection::Orders)?;
        orders
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::not_found("order", id))
    }

    /// Orders visible to `viewer`, newest first: admins see all, others their own.
    pub fn list_for(&self, viewer: &User) -> AppResult<Vec<Order>> {
        let orders: Vec<Order> = self.store.load(Collection::Orders)?;
        if viewer.is_admin() {
            return Ok(orders);
        }
        Ok(orders
            .into_iter()
            .filter(|o| o.user_id == viewer.id)
            .collect())
    }

    /// Order counts for `viewer`; "this month" is the calendar month in `tz`.
    pub fn stats(&self, viewer: &User, tz: Tz) -> AppResult<OrderStats> {
        let orders = self.list_for(viewer)?;
        let now = self.clock.now().with_timezone(&tz);

        let this_month_orders = orders
            .iter()
            .map(|o| o.created_at.with_timezone(&tz))
            .filter(|at| at.year() == now.year() && at.month() == now.month())
            .count();

        Ok(OrderStats {
            total_orders: orders.len(),
            this_month_orders,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
