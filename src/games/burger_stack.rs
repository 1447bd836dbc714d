//! 拼汉堡小游戏
//!
//! 按正确顺序点选配料拼出一个 Whopper，点错一次即失败

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// 配料
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    pub name: &'static str,
    pub emoji: &'static str,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.name)
    }
}

/// Whopper 配方，从下往上
pub const WHOPPER_RECIPE: [Ingredient; 10] = [
    Ingredient { name: "Bottom Bun", emoji: "🍔⬇️" },
    Ingredient { name: "Patty", emoji: "🥩" },
    Ingredient { name: "Cheese", emoji: "🧀" },
    Ingredient { name: "Pickles", emoji: "🥒" },
    Ingredient { name: "Tomato", emoji: "🍅" },
    Ingredient { name: "Lettuce", emoji: "🥬" },
    Ingredient { name: "Ketchup", emoji: "🥫" },
    Ingredient { name: "Mayonnaise", emoji: "⚪" },
    Ingredient { name: "Onion", emoji: "🧅" },
    Ingredient { name: "Top Bun", emoji: "🍔⬆️" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurgerStatus {
    Playing,
    Won,
    Lost,
}

/// 放一层配料的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOutcome {
    Added(Ingredient),
    Won,
    Lost {
        added: Ingredient,
        expected: Ingredient,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    #[error("there is no ingredient number {0}")]
    UnknownIngredient(usize),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone)]
pub struct BurgerStackGame {
    /// 展示给玩家的配料顺序（打乱过）
    pantry: Vec<Ingredient>,
    stack: Vec<Ingredient>,
    status: BurgerStatus,
}

impl BurgerStackGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pantry = WHOPPER_RECIPE.to_vec();
        pantry.shuffle(rng);
        Self::with_pantry(pantry)
    }

    /// 按指定顺序展示配料
    pub fn with_pantry(pantry: Vec<Ingredient>) -> Self {
        Self {
            pantry,
            stack: Vec::with_capacity(WHOPPER_RECIPE.len()),
            status: BurgerStatus::Playing,
        }
    }

    pub fn pantry(&self) -> &[Ingredient] {
        &self.pantry
    }

    pub fn stack(&self) -> &[Ingredient] {
        &self.stack
    }

    pub fn status(&self) -> BurgerStatus {
        self.status
    }

    pub fn next_expected(&self) -> Option<Ingredient> {
        WHOPPER_RECIPE.get(self.stack.len()).copied()
    }

    /// 放入展示列表中第 `pantry_index` 个配料（从 0 开始）
    pub fn add(&mut self, pantry_index: usize) -> Result<StackOutcome, StackError> {
        if self.status != BurgerStatus::Playing {
            return Err(StackError::GameOver);
        }
        let ingredient = *self
            .pantry
            .get(pantry_index)
            .ok_or(StackError::UnknownIngredient(pantry_index))?;
        let expected = self.next_expected().ok_or(StackError::GameOver)?;

        if ingredient != expected {
            self.status = BurgerStatus::Lost;
            return Ok(StackOutcome::Lost {
                added: ingredient,
                expected,
            });
        }

        self.stack.push(ingredient);
        if self.stack.len() == WHOPPER_RECIPE.len() {
            self.status = BurgerStatus::Won;
            return Ok(StackOutcome::Won);
        }
        Ok(StackOutcome::Added(ingredient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn index_of(game: &BurgerStackGame, name: &str) -> usize {
        game.pantry().iter().position(|i| i.name == name).unwrap()
    }

    #[test]
    fn test_build_full_whopper() {
        let mut game = BurgerStackGame::new(&mut StdRng::seed_from_u64(3));
        for (step, ingredient) in WHOPPER_RECIPE.iter().enumerate() {
            let outcome = game.add(index_of(&game, ingredient.name)).unwrap();
            if step + 1 == WHOPPER_RECIPE.len() {
                assert_eq!(outcome, StackOutcome::Won);
            } else {
                assert_eq!(outcome, StackOutcome::Added(*ingredient));
            }
        }
        assert_eq!(game.status(), BurgerStatus::Won);
        assert_eq!(game.stack(), &WHOPPER_RECIPE[..]);
        assert_eq!(game.add(0), Err(StackError::GameOver));
    }

    #[test]
    fn test_wrong_ingredient_loses() {
        let mut game = BurgerStackGame::with_pantry(WHOPPER_RECIPE.to_vec());
        assert_eq!(game.add(0), Ok(StackOutcome::Added(WHOPPER_RECIPE[0])));
        assert_eq!(
            game.add(2),
            Ok(StackOutcome::Lost {
                added: WHOPPER_RECIPE[2],
                expected: WHOPPER_RECIPE[1],
            })
        );
        assert_eq!(game.status(), BurgerStatus::Lost);
        assert_eq!(game.stack().len(), 1);
        assert_eq!(game.add(1), Err(StackError::GameOver));
    }

    #[test]
    fn test_unknown_ingredient_does_not_end_game() {
        let mut game = BurgerStackGame::with_pantry(WHOPPER_RECIPE.to_vec());
        assert_eq!(game.add(10), Err(StackError::UnknownIngredient(10)));
        assert_eq!(game.status(), BurgerStatus::Playing);
    }

    #[test]
    fn test_pantry_is_a_permutation_of_recipe() {
        let game = BurgerStackGame::new(&mut StdRng::seed_from_u64(11));
        let mut names: Vec<_> = game.pantry().iter().map(|i| i.name).collect();
        let mut expected: Vec<_> = WHOPPER_RECIPE.iter().map(|i| i.name).collect();
        names.sort();
        expected.sort();
        assert_eq!(names, expected);
    }
}
