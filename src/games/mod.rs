pub mod burger_stack;
pub mod guess_number;

pub use burger_stack::{BurgerStackGame, BurgerStatus, Ingredient, StackOutcome, WHOPPER_RECIPE};
pub use guess_number::{GuessNumberGame, GuessOutcome};
