//! # chilli-bowl
//!
//! A bounded, blocking order queue shared by customer (producer) and cook
//! (consumer) threads, plus the kitchen that runs them.
//!
//! ```no_run
//! use chilli_bowl::{Kitchen, KitchenConfig};
//!
//! let report = Kitchen::new(KitchenConfig::default())?.serve()?;
//! assert_eq!(report.orders_placed, report.orders_fulfilled);
//! # Ok::<(), chilli_bowl::KitchenError>(())
//! ```

pub mod config;
pub mod error;
pub mod kitchen;
pub mod menu;
pub mod order;
pub mod queue;
pub mod trace;

pub use config::KitchenConfig;
pub use error::{ConfigError, KitchenError, QueueError};
pub use kitchen::{CookTally, Kitchen, ServiceReport};
pub use menu::MenuItem;
pub use order::Order;
pub use queue::{OrderQueue, QueueStats, WorkItem};
