pub mod toml_loader;

pub use toml_loader::{load_orders_from_toml, OrdersFile};
