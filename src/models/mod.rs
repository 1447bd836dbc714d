pub mod loaders;
pub mod order;
pub mod question;

pub use loaders::load_orders_from_toml;
pub use order::{Order, OrderItem};
pub use question::{NormalizedQuestion, OptionLetter, QuizWarning, RawQuestion};
