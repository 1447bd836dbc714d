//! 终端状态机 - 流程层
//!
//! 同一时刻只有一个状态处于活动中。每个状态自己持有它的子状态
//! （测验会话、游戏进度），切换状态时旧状态连同子状态一起被丢弃，
//! 因此不需要在每个入口单独重置其它功能。

use std::fmt;
use tracing::debug;

use crate::games::{BurgerStackGame, GuessNumberGame};
use crate::models::order::Order;
use crate::workflow::quiz_session::QuizSession;

#[derive(Debug, Clone, Default)]
pub enum KioskState {
    /// 等待输入订单号
    #[default]
    Idle,
    /// 显示订单详情和功能菜单
    OrderView { order: Order },
    QuizActive { order: Order, session: QuizSession },
    QuizDone { order: Order, session: QuizSession },
    /// 小游戏选择菜单
    GameMenu { order: Order },
    GuessGame { order: Order, game: GuessNumberGame },
    BurgerGame { order: Order, game: BurgerStackGame },
}

impl KioskState {
    pub fn name(&self) -> &'static str {
        match self {
            KioskState::Idle => "Idle",
            KioskState::OrderView { .. } => "OrderView",
            KioskState::QuizActive { .. } => "QuizActive",
            KioskState::QuizDone { .. } => "QuizDone",
            KioskState::GameMenu { .. } => "GameMenu",
            KioskState::GuessGame { .. } => "GuessGame",
            KioskState::BurgerGame { .. } => "BurgerGame",
        }
    }

    /// 当前状态关联的订单
    pub fn order(&self) -> Option<&Order> {
        match self {
            KioskState::Idle => None,
            KioskState::OrderView { order }
            | KioskState::QuizActive { order, .. }
            | KioskState::QuizDone { order, .. }
            | KioskState::GameMenu { order }
            | KioskState::GuessGame { order, .. }
            | KioskState::BurgerGame { order, .. } => Some(order),
        }
    }

    /// 切换到新状态，返回旧状态
    ///
    /// 这是唯一的切换入口：旧状态的所有子状态随返回值一起交还调用方
    pub fn transition(&mut self, next: KioskState) -> KioskState {
        debug!("状态切换: {} → {}", self.name(), next.name());
        std::mem::replace(self, next)
    }

    /// 回到订单详情；没有订单时回到 Idle
    pub fn return_home(&mut self) -> KioskState {
        let next = match self.order() {
            Some(order) => KioskState::OrderView {
                order: order.clone(),
            },
            None => KioskState::Idle,
        };
        self.transition(next)
    }
}

impl fmt::Display for KioskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quiz_service::fallback_questions;

    fn order() -> Order {
        Order::new("38", "2x Burger, 1x Coke", "Preparing")
    }

    #[test]
    fn test_transition_replaces_substate() {
        let mut state = KioskState::OrderView { order: order() };
        let session = QuizSession::new("Coca-Cola", fallback_questions(), None).unwrap();
        state.transition(KioskState::QuizActive {
            order: order(),
            session,
        });
        assert_eq!(state.name(), "QuizActive");

        let previous = state.transition(KioskState::GuessGame {
            order: order(),
            game: GuessNumberGame::with_secret(50),
        });
        assert!(matches!(previous, KioskState::QuizActive { .. }));
        assert_eq!(state.to_string(), "GuessGame");
    }

    #[test]
    fn test_return_home_keeps_order() {
        let mut state = KioskState::GameMenu { order: order() };
        state.return_home();
        assert!(matches!(&state, KioskState::OrderView { order } if order.order_id == "38"));

        let mut idle = KioskState::default();
        idle.return_home();
        assert!(matches!(idle, KioskState::Idle));
        assert!(idle.order().is_none());
    }
}
