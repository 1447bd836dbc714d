//! 终端互动程序 - 编排层
//!
//! ## 职责
//!
//! - 读取顾客输入的命令，交给当前状态处理
//! - 通过 `KioskState::transition` 切换页面
//! - 调用测验 / 趣闻服务，并缓存它们的结果
//! - 把当前页面渲染成文本
//!
//! 本层不做题目解析、不做游戏判定，只做调度和展示。

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::games::{
    BurgerStackGame, BurgerStatus, GuessNumberGame, GuessOutcome, StackOutcome,
};
use crate::models::order::Order;
use crate::models::question::OptionLetter;
use crate::orchestrator::cache::TtlCache;
use crate::services::quiz_service::effective_topic;
use crate::services::{
    DiagnosticsWriter, FactService, OrderBook, QuizBatch, QuizService, TextGenerator,
};
use crate::workflow::{Feedback, KioskState, QuizSession, QuizSummary};

const TITLE: &str = "🍔 Burger King - Engage & Entertain 🎮";
const RULE: &str = "────────────────────────────────────────";

/// 终端互动程序
pub struct Kiosk<G> {
    state: KioskState,
    orders: OrderBook,
    quiz_service: QuizService<G>,
    fact_service: FactService<G>,
    quiz_cache: TtlCache<(String, usize), QuizBatch>,
    fact_cache: TtlCache<String, String>,
    question_count: usize,
    rng: StdRng,
}

impl<G: TextGenerator> Kiosk<G> {
    pub fn new(config: &Config, generator: Arc<G>, orders: OrderBook) -> Self {
        let quiz_service = QuizService::new(generator.clone())
            .with_diagnostics(DiagnosticsWriter::with_path(&config.diagnostics_file));

        Self {
            state: KioskState::default(),
            orders,
            quiz_service,
            fact_service: FactService::new(generator),
            quiz_cache: TtlCache::new(
                config.cache_capacity,
                Duration::from_secs(config.quiz_cache_ttl_secs),
            ),
            fact_cache: TtlCache::new(
                config.cache_capacity,
                Duration::from_secs(config.fact_cache_ttl_secs),
            ),
            question_count: config.quiz_question_count.max(1),
            rng: StdRng::from_entropy(),
        }
    }

    /// 使用固定的随机数源（测试用）
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &KioskState {
        &self.state
    }

    /// 交互主循环：stdin 读命令，stdout 输出页面，`quit` 退出
    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        write_screen(&mut stdout, &self.render()).await?;

        while let Some(line) = lines.next_line().await? {
            if matches!(line.trim().to_lowercase().as_str(), "quit" | "exit") {
                break;
            }
            let screen = self.handle_command(&line).await;
            write_screen(&mut stdout, &screen).await?;
        }

        info!("👋 终端已退出");
        Ok(())
    }

    /// 处理一条命令，返回新的页面内容（前面附带本次操作的提示）
    pub async fn handle_command(&mut self, input: &str) -> String {
        let input = input.trim();
        let command = input.to_lowercase();

        let message = match command.as_str() {
            "" => None,
            "help" => Some(self.help().to_string()),
            "home" => {
                self.state.return_home();
                None
            }
            "new" => {
                self.state.transition(KioskState::Idle);
                None
            }
            _ => self.dispatch(input, &command).await,
        };

        match message {
            Some(message) => format!("{}\n\n{}", message, self.render()),
            None => self.render(),
        }
    }

    async fn dispatch(&mut self, input: &str, command: &str) -> Option<String> {
        match self.state {
            KioskState::Idle => Some(self.lookup_order(input)),
            KioskState::OrderView { .. } => self.order_menu(command).await,
            KioskState::GameMenu { .. } => self.game_menu(command),
            KioskState::QuizActive { .. } => self.quiz_command(command),
            KioskState::QuizDone { .. } => self.quiz_done_command(command).await,
            KioskState::GuessGame { .. } => self.guess_command(command),
            KioskState::BurgerGame { .. } => self.burger_command(command),
        }
    }

    // ========== 各状态的命令处理 ==========

    fn lookup_order(&mut self, order_id: &str) -> String {
        match self.orders.get_order_details(order_id) {
            Some(order) => {
                info!("✓ 找到订单 {}: {}", order.order_id, order.items);
                let order = order.clone();
                self.state.transition(KioskState::OrderView { order });
                "Order Found! 🎉".to_string()
            }
            None => {
                warn!("订单 {} 不存在", order_id);
                format!(
                    "Order ID `{}` not found. Please double-check and try again.\n\
                     Currently, our system recognizes Order IDs: {}.",
                    order_id,
                    english_list(&self.orders.known_ids())
                )
            }
        }
    }

    async fn order_menu(&mut self, command: &str) -> Option<String> {
        let order = self.state.order()?.clone();
        match command {
            "fact" => {
                let item = order.first_item().map(|item| item.name).unwrap_or_default();
                let fact = self.fun_fact(&item).await;
                Some(format!("💡 {}", fact))
            }
            "quiz" => self.start_quiz(order).await,
            "games" => {
                self.state.transition(KioskState::GameMenu { order });
                None
            }
            other => Some(unknown_command(other)),
        }
    }

    fn game_menu(&mut self, command: &str) -> Option<String> {
        let order = self.state.order()?.clone();
        match command {
            "guess" => {
                let game = GuessNumberGame::new(&mut self.rng);
                self.state.transition(KioskState::GuessGame { order, game });
                Some("I'm thinking of a number between 1 and 100. Can you guess it?".to_string())
            }
            "burger" => {
                let game = BurgerStackGame::new(&mut self.rng);
                self.state.transition(KioskState::BurgerGame { order, game });
                Some("Start by adding the Bottom Bun!".to_string())
            }
            other => Some(unknown_command(other)),
        }
    }

    fn quiz_command(&mut self, command: &str) -> Option<String> {
        let KioskState::QuizActive { order, session } = &mut self.state else {
            return None;
        };

        if let Some(index) = parse_option(command) {
            if index >= session.current_question().shuffled_options.len() {
                return Some(format!("There is no option {}.", command.to_uppercase()));
            }
            return session.select(index).err().map(|e| capitalize(&e.to_string()));
        }

        match command {
            "submit" => Some(match session.submit() {
                Ok(Feedback::Correct) => "Correct! 🎉".to_string(),
                Ok(Feedback::Incorrect { correct_text }) => {
                    format!("Incorrect. The correct answer was: {}", correct_text)
                }
                Err(e) => capitalize(&e.to_string()),
            }),
            "next" => session.next().err().map(|e| capitalize(&e.to_string())),
            "back" => session.back().err().map(|e| capitalize(&e.to_string())),
            "finish" => match session.finish() {
                Ok(summary) => {
                    info!(
                        "测验完成: {} 得分 {}/{} ({:?})",
                        session.topic(),
                        session.score(),
                        session.len(),
                        summary
                    );
                    let next = KioskState::QuizDone {
                        order: order.clone(),
                        session: session.clone(),
                    };
                    self.state.transition(next);
                    None
                }
                Err(e) => Some(capitalize(&e.to_string())),
            },
            other => Some(unknown_command(other)),
        }
    }

    async fn quiz_done_command(&mut self, command: &str) -> Option<String> {
        let order = self.state.order()?.clone();
        match command {
            "again" => self.start_quiz(order).await,
            other => Some(unknown_command(other)),
        }
    }

    fn guess_command(&mut self, command: &str) -> Option<String> {
        let KioskState::GuessGame { game, .. } = &mut self.state else {
            return None;
        };

        if command == "again" {
            if !game.is_over() {
                return Some("Finish this round first, or type `home` to leave.".to_string());
            }
            *game = GuessNumberGame::new(&mut self.rng);
            return Some("I'm thinking of a number between 1 and 100. Can you guess it?".to_string());
        }

        let Ok(guess) = command.parse::<u32>() else {
            return Some(unknown_command(command));
        };

        Some(match game.guess(guess) {
            Ok(GuessOutcome::TooLow) => format!("Your guess ({}) is Too LOW! Try again.", guess),
            Ok(GuessOutcome::TooHigh) => format!("Your guess ({}) is Too HIGH! Try again.", guess),
            Ok(GuessOutcome::Correct { attempts }) => format!(
                "Congratulations! You guessed the number ({}) in {} attempts! 🎉",
                guess, attempts
            ),
            Err(e) => capitalize(&e.to_string()),
        })
    }

    fn burger_command(&mut self, command: &str) -> Option<String> {
        let KioskState::BurgerGame { game, .. } = &mut self.state else {
            return None;
        };

        if command == "again" {
            if game.status() == BurgerStatus::Playing {
                return Some("Finish this burger first, or type `home` to leave.".to_string());
            }
            *game = BurgerStackGame::new(&mut self.rng);
            return Some("Start by adding the Bottom Bun!".to_string());
        }

        let Some(index) = command.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            return Some(unknown_command(command));
        };

        Some(match game.add(index) {
            Ok(StackOutcome::Added(ingredient)) => format!("Added {}! Good.", ingredient.name),
            Ok(StackOutcome::Won) => "Congratulations! You built a perfect Whopper! 🎉".to_string(),
            Ok(StackOutcome::Lost { added, expected }) => format!(
                "Oops! You added {}, but the next ingredient should have been {}. Game Over! 😭",
                added.name, expected.name
            ),
            Err(e) => capitalize(&e.to_string()),
        })
    }

    // ========== 服务调用（带缓存） ==========

    async fn start_quiz(&mut self, order: Order) -> Option<String> {
        let topic = order.quiz_topic().to_string();
        let batch = self.quiz_batch(&topic).await;
        let notice = batch.notice().map(str::to_string);

        match QuizSession::new(topic.clone(), batch.questions, notice) {
            Some(session) => {
                self.state
                    .transition(KioskState::QuizActive { order, session });
                None
            }
            None => Some(format!(
                "Could not generate a quiz about {}. Please try again later or with a different order.",
                topic
            )),
        }
    }

    async fn quiz_batch(&mut self, topic: &str) -> QuizBatch {
        let key = (topic.to_string(), self.question_count);
        if let Some(batch) = self.quiz_cache.get(&key) {
            info!("使用缓存的测验: {}", topic);
            return batch;
        }

        let batch = self
            .quiz_service
            .generate_quiz_report(topic, self.question_count)
            .await;

        // 兜底题目不缓存，下次还会重新请求 LLM
        if !batch.is_fallback() {
            self.quiz_cache.insert(key, batch.clone());
        }
        batch
    }

    async fn fun_fact(&mut self, item: &str) -> String {
        let key = item.to_lowercase();
        if let Some(fact) = self.fact_cache.get(&key) {
            return fact;
        }
        let fact = self.fact_service.generate_fun_fact(item).await;
        self.fact_cache.insert(key, fact.clone());
        fact
    }

    // ========== 渲染 ==========

    /// 把当前状态渲染成文本页面
    pub fn render(&self) -> String {
        Screen(&self.state).to_string()
    }

    fn help(&self) -> &'static str {
        match self.state {
            KioskState::Idle => "Type your Order ID, or `quit` to leave.",
            KioskState::OrderView { .. } => {
                "Commands: `fact`, `quiz`, `games`, `new` (another order), `quit`."
            }
            KioskState::GameMenu { .. } => "Commands: `guess`, `burger`, `home`.",
            KioskState::QuizActive { .. } => {
                "Commands: `1`-`4` or `A`-`D` to pick, `submit`, `next`, `back`, `finish`, `home`."
            }
            KioskState::QuizDone { .. } => "Commands: `again`, `home`.",
            KioskState::GuessGame { .. } => "Type a number from 1 to 100, `again`, or `home`.",
            KioskState::BurgerGame { .. } => {
                "Type an ingredient number, `again` after a round, or `home`."
            }
        }
    }
}

// ========== 页面渲染 ==========

/// 某个状态对应的终端页面
struct Screen<'a>(&'a KioskState);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TITLE)?;
        writeln!(f, "{}", RULE)?;

        match self.0 {
            KioskState::Idle => {
                writeln!(f, "Your Order Experience")?;
                writeln!(f, "Enter your Order ID below to start the fun! (e.g. 38)")?;
            }
            KioskState::OrderView { order } => render_order(f, order)?,
            KioskState::GameMenu { .. } => {
                writeln!(f, "🎮 Choose Your Mini-Game!")?;
                writeln!(f, "  guess   🔢 Guess the Number")?;
                writeln!(f, "  burger  🍔 Build the Whopper")?;
                writeln!(f, "  home    🏠 Return to Order Details")?;
            }
            KioskState::QuizActive { session, .. } => render_quiz(f, session)?,
            KioskState::QuizDone { session, .. } => render_quiz_done(f, session)?,
            KioskState::GuessGame { game, .. } => render_guess_game(f, game)?,
            KioskState::BurgerGame { game, .. } => render_burger_game(f, game)?,
        }

        write!(f, "{}", RULE)
    }
}

fn render_order(f: &mut fmt::Formatter<'_>, order: &Order) -> fmt::Result {
    writeln!(f, "Details for Order ID: `{}`", order.order_id)?;
    writeln!(f, "Items:")?;
    for item in order.parsed_items() {
        writeln!(f, "  {} × {}", item.quantity, item.name)?;
    }
    writeln!(f, "Status: {}", order.status)?;
    writeln!(f)?;
    writeln!(f, "What would you like to do while you wait?")?;
    writeln!(f, "  fact   💡 Fun Facts about your order")?;
    writeln!(f, "  quiz   🧠 Play a Quiz related to your order")?;
    writeln!(f, "  games  🎮 Play a Short Game")
}

fn render_quiz(f: &mut fmt::Formatter<'_>, session: &QuizSession) -> fmt::Result {
    let question = session.current_question();
    let record = session.current_record();

    writeln!(f, "🧠 Quiz Time: {}!", effective_topic(session.topic()))?;
    if let Some(notice) = session.notice() {
        writeln!(f, "ℹ️  {}", notice)?;
    }
    writeln!(
        f,
        "Question {} of {}",
        session.current_index() + 1,
        session.len()
    )?;
    writeln!(f, "{}", question.question_text)?;

    for (i, option) in question.shuffled_options.iter().enumerate() {
        let marker = if record.selected == Some(i) { "👉" } else { "  " };
        let letter = OptionLetter::from_index(i).map(|l| l.as_char()).unwrap_or('?');
        writeln!(f, "{} {}. {}", marker, letter, option)?;
    }

    match &record.feedback {
        Some(Feedback::Correct) => writeln!(f, "✅ Correct! 🎉")?,
        Some(Feedback::Incorrect { correct_text }) => {
            writeln!(f, "❌ Incorrect. The correct answer was: {}", correct_text)?
        }
        None => {}
    }

    if record.is_submitted() {
        writeln!(f, "You've already answered this question!")?;
        if session.is_last() {
            writeln!(f, "Type `finish` to see your score.")
        } else {
            writeln!(f, "Type `next` for the next question.")
        }
    } else if record.selected.is_some() {
        writeln!(f, "Type `submit` to lock in your answer.")
    } else {
        writeln!(f, "Choose your answer (A-D).")
    }
}

fn render_quiz_done(f: &mut fmt::Formatter<'_>, session: &QuizSession) -> fmt::Result {
    writeln!(f, "Quiz Completed! 🥳")?;
    writeln!(f, "You scored: {} out of {}!", session.score(), session.len())?;
    writeln!(
        f,
        "{}",
        match session.summary() {
            QuizSummary::Perfect => "Amazing! You're a true trivia master! 🏆",
            QuizSummary::Good => "Good job! You know your stuff. Keep playing! 👍",
            QuizSummary::TryAgain => "Nice try! Keep learning and play again to improve! 😉",
        }
    )?;
    writeln!(f, "Type `again` to play again or `home` to return to your order.")
}

fn render_guess_game(f: &mut fmt::Formatter<'_>, game: &GuessNumberGame) -> fmt::Result {
    writeln!(f, "🎮 Guess the Number!")?;
    match game.revealed_secret() {
        Some(secret) => {
            writeln!(
                f,
                "The number was {}. You took {} attempts.",
                secret,
                game.attempts()
            )?;
            writeln!(f, "Type `again` to play again or `home` to return to your order.")
        }
        None => writeln!(
            f,
            "Try to guess the number I'm thinking of, between 1 and 100. Attempts so far: {}",
            game.attempts()
        ),
    }
}

fn render_burger_game(f: &mut fmt::Formatter<'_>, game: &BurgerStackGame) -> fmt::Result {
    writeln!(f, "🍔 Build the Whopper!")?;

    if game.stack().is_empty() {
        writeln!(f, "Start with the Bottom Bun!")?;
    } else {
        writeln!(f, "Your Whopper Stack:")?;
        for ingredient in game.stack().iter().rev() {
            writeln!(f, "    {}", ingredient)?;
        }
    }

    match game.status() {
        BurgerStatus::Playing => {
            writeln!(f, "Available Ingredients:")?;
            for (i, ingredient) in game.pantry().iter().enumerate() {
                writeln!(f, "  {:>2}) {}", i + 1, ingredient)?;
            }
            Ok(())
        }
        BurgerStatus::Won => {
            writeln!(f, "Game Over! You built a perfect Whopper!")?;
            writeln!(f, "Type `again` to play again or `home` to return to your order.")
        }
        BurgerStatus::Lost => {
            writeln!(f, "Game Over! You made a mistake! Try again.")?;
            writeln!(f, "Type `again` to play again or `home` to return to your order.")
        }
    }
}

// ========== 其它辅助函数 ==========

async fn write_screen(stdout: &mut tokio::io::Stdout, screen: &str) -> Result<()> {
    stdout.write_all(screen.as_bytes()).await?;
    stdout.write_all(b"\n> ").await?;
    stdout.flush().await?;
    Ok(())
}

/// `A`-`D` 或 `1`-`4` → 选项下标
fn parse_option(command: &str) -> Option<usize> {
    if let Some(letter) = OptionLetter::parse(command) {
        return Some(letter.index());
    }
    command.parse::<usize>().ok()?.checked_sub(1)
}

fn unknown_command(command: &str) -> String {
    format!("Unknown command `{}`. Type `help` to see what you can do.", command)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `["38", "39", "40"]` → `"38, 39, and 40"`
fn english_list(items: &[&str]) -> String {
    match items {
        [] => "none".to_string(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list() {
        assert_eq!(english_list(&[]), "none");
        assert_eq!(english_list(&["38"]), "38");
        assert_eq!(english_list(&["38", "39"]), "38 and 39");
        assert_eq!(english_list(&["38", "39", "40", "41"]), "38, 39, 40, and 41");
    }

    #[test]
    fn test_parse_option() {
        assert_eq!(parse_option("a"), Some(0));
        assert_eq!(parse_option("D"), Some(3));
        assert_eq!(parse_option("2"), Some(1));
        assert_eq!(parse_option("0"), None);
        assert_eq!(parse_option("9"), Some(8));
        assert_eq!(parse_option("submit"), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pick an answer first"), "Pick an answer first");
        assert_eq!(capitalize(""), "");
    }
}
