//! Customer and cook threads around one shared [`OrderQueue`].
//!
//! A run opens the queue, starts the customers and cooks, joins the
//! customers, closes production, joins the cooks and finally closes the
//! queue, which checks that every order was cooked exactly once.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::KitchenConfig;
use crate::error::KitchenError;
use crate::menu;
use crate::order::Order;
use crate::queue::{OrderQueue, QueueStats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookTally {
    pub cook_id: usize,
    pub fulfilled: u64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub orders_placed: u64,
    pub orders_fulfilled: u64,
    pub per_cook: Vec<CookTally>,
    pub stats: QueueStats,
}

pub struct Kitchen {
    config: KitchenConfig,
}

impl Kitchen {
    pub fn new(config: KitchenConfig) -> Result<Self, KitchenError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs every customer and cook to completion.
    ///
    /// # Errors
    ///
    /// Fails when the queue cannot be opened, a thread cannot be spawned or
    /// a thread panics. The queue has no cancellation, so threads already
    /// running when such an error is returned are left behind: cooks stay
    /// parked if a customer panicked before placing all its orders, and
    /// customers stay blocked on a full queue if a cook failed to spawn.
    pub fn serve(&self) -> Result<ServiceReport, KitchenError> {
        let expected = self.config.expected_orders()?;
        let queue = Arc::new(OrderQueue::open(self.config.capacity, expected)?);
        info!(
            customers = self.config.customers,
            cooks = self.config.cooks,
            expected,
            "restaurant is open"
        );

        let customers = (0..self.config.customers)
            .map(|customer_id| {
                let queue = Arc::clone(&queue);
                let orders = self.config.orders_per_customer;
                spawn_named(format!("customer-{customer_id}"), move || {
                    place_orders(&queue, customer_id, orders)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cook_time = Duration::from_millis(self.config.cook_time_ms);
        let cooks = (0..self.config.cooks)
            .map(|cook_id| {
                let queue = Arc::clone(&queue);
                spawn_named(format!("cook-{cook_id}"), move || {
                    cook_orders(&queue, cook_id, cook_time)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let orders_placed: u64 = join_all(customers)?.into_iter().sum();

        // The last submit only woke one cook.
        queue.close_production();

        let per_cook: Vec<CookTally> = join_all(cooks)?
            .into_iter()
            .enumerate()
            .map(|(cook_id, fulfilled)| CookTally { cook_id, fulfilled })
            .collect();
        let orders_fulfilled: u64 = per_cook.iter().map(|tally| tally.fulfilled).sum();

        let queue = Arc::try_unwrap(queue).map_err(|shared| KitchenError::QueueStillShared {
            holders: Arc::strong_count(&shared),
        })?;
        let stats = queue.close();
        info!(orders_fulfilled, "restaurant is closed");

        Ok(ServiceReport {
            orders_placed,
            orders_fulfilled,
            per_cook,
            stats,
        })
    }
}

fn place_orders(queue: &OrderQueue<Order>, customer_id: usize, orders: usize) -> u64 {
    let mut placed = 0;
    for _ in 0..orders {
        let item = menu::pick_random_thread();
        let order_number = queue.submit(Order::new(customer_id, item));
        debug!(customer_id, order_number, %item, "order placed");
        placed += 1;
    }
    placed
}

fn cook_orders(queue: &OrderQueue<Order>, cook_id: usize, cook_time: Duration) -> u64 {
    let mut fulfilled = 0;
    while let Some(work) = queue.take() {
        if !cook_time.is_zero() {
            thread::sleep(cook_time);
        }
        debug!(
            cook_id,
            order_number = work.sequence_number(),
            order = %work.payload(),
            "order fulfilled"
        );
        fulfilled += 1;
    }
    info!(cook_id, fulfilled, "cook is done");
    fulfilled
}

fn spawn_named<F, R>(name: String, f: F) -> Result<(String, JoinHandle<R>), KitchenError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    match thread::Builder::new().name(name.clone()).spawn(f) {
        Ok(handle) => Ok((name, handle)),
        Err(source) => Err(KitchenError::Spawn { name, source }),
    }
}

fn join_all<R>(handles: Vec<(String, JoinHandle<R>)>) -> Result<Vec<R>, KitchenError> {
    handles
        .into_iter()
        .map(|(name, handle)| {
            handle
                .join()
                .map_err(|_| KitchenError::ThreadPanicked { name })
        })
        .collect()
}
