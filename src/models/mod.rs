pub mod cafe;
pub mod catalog;
pub mod record;
pub mod task;

pub use cafe::{Drink, Shop, ShopStatus};
pub use catalog::{CartLine, MenuItem};
pub use record::{Fields, Record, to_fields};
pub use task::Task;
