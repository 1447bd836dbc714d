//! 猜数字小游戏
//!
//! 系统在 1..=100 中选一个数字，玩家每次猜测都会得到"太小 / 太大 / 猜中"的提示

use rand::Rng;
use thiserror::Error;

pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 100;

/// 单次猜测的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Correct { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("guess {0} is outside 1..=100")]
    OutOfRange(u32),
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GuessNumberGame {
    secret: u32,
    attempts: u32,
    over: bool,
}

impl GuessNumberGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_secret(rng.gen_range(MIN_NUMBER..=MAX_NUMBER))
    }

    pub fn with_secret(secret: u32) -> Self {
        Self {
            secret: secret.clamp(MIN_NUMBER, MAX_NUMBER),
            attempts: 0,
            over: false,
        }
    }

    /// 猜一次；超出范围的猜测不计入次数
    pub fn guess(&mut self, guess: u32) -> Result<GuessOutcome, GuessError> {
        if self.over {
            return Err(GuessError::GameOver);
        }
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&guess) {
            return Err(GuessError::OutOfRange(guess));
        }

        self.attempts += 1;

        let outcome = match guess.cmp(&self.secret) {
            std::cmp::Ordering::Less => GuessOutcome::TooLow,
            std::cmp::Ordering::Greater => GuessOutcome::TooHigh,
            std::cmp::Ordering::Equal => {
                self.over = true;
                GuessOutcome::Correct {
                    attempts: self.attempts,
                }
            }
        };
        Ok(outcome)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// 游戏结束后才公开答案
    pub fn revealed_secret(&self) -> Option<u32> {
        self.over.then_some(self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_guess_sequence() {
        let mut game = GuessNumberGame::with_secret(42);
        assert_eq!(game.guess(10), Ok(GuessOutcome::TooLow));
        assert_eq!(game.guess(90), Ok(GuessOutcome::TooHigh));
        assert_eq!(game.revealed_secret(), None);
        assert_eq!(game.guess(42), Ok(GuessOutcome::Correct { attempts: 3 }));
        assert!(game.is_over());
        assert_eq!(game.revealed_secret(), Some(42));
        assert_eq!(game.guess(42), Err(GuessError::GameOver));
    }

    #[test]
    fn test_out_of_range_guess_is_not_counted() {
        let mut game = GuessNumberGame::with_secret(5);
        assert_eq!(game.guess(0), Err(GuessError::OutOfRange(0)));
        assert_eq!(game.guess(101), Err(GuessError::OutOfRange(101)));
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn test_random_secret_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let game = GuessNumberGame::new(&mut rng);
            assert!((MIN_NUMBER..=MAX_NUMBER).contains(&game.secret));
        }
    }
}
