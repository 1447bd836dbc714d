//! 测验会话 - 流程层
//!
//! 保存一次测验的题目、当前位置、每道题的作答记录和得分。
//! 作答记录按题目下标存放在 `QuestionRecord` 中。

use thiserror::Error;

use crate::models::question::NormalizedQuestion;

/// 提交后的反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_text: String },
}

/// 单道题的作答记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionRecord {
    pub selected: Option<usize>,
    pub feedback: Option<Feedback>,
}

impl QuestionRecord {
    pub fn is_submitted(&self) -> bool {
        self.feedback.is_some()
    }
}

/// 测验结束时的评价
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizSummary {
    /// 全部答对
    Perfect,
    /// 至少答对一半
    Good,
    TryAgain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("option {0} does not exist")]
    OptionOutOfRange(usize),
    #[error("pick an answer first")]
    NoSelection,
    #[error("this question has already been answered")]
    AlreadySubmitted,
    #[error("answer this question first")]
    NotSubmitted,
    #[error("this is the last question")]
    NoNextQuestion,
    #[error("this is the first question")]
    NoPreviousQuestion,
    #[error("answer every question before finishing")]
    NotFinished,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    topic: String,
    questions: Vec<NormalizedQuestion>,
    records: Vec<QuestionRecord>,
    current: usize,
    score: usize,
    notice: Option<String>,
}

impl QuizSession {
    /// 没有题目时返回 None
    pub fn new(
        topic: impl Into<String>,
        questions: Vec<NormalizedQuestion>,
        notice: Option<String>,
    ) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        let records = vec![QuestionRecord::default(); questions.len()];
        Some(Self {
            topic: topic.into(),
            questions,
            records,
            current: 0,
            score: 0,
            notice,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &NormalizedQuestion {
        &self.questions[self.current]
    }

    pub fn current_record(&self) -> &QuestionRecord {
        &self.records[self.current]
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// 选择当前题的选项（从 0 开始）
    pub fn select(&mut self, option_index: usize) -> Result<(), SessionError> {
        if self.current_record().is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        if option_index >= self.current_question().shuffled_options.len() {
            return Err(SessionError::OptionOutOfRange(option_index));
        }
        self.records[self.current].selected = Some(option_index);
        Ok(())
    }

    /// 提交当前题，每道题只能提交一次
    pub fn submit(&mut self) -> Result<Feedback, SessionError> {
        let record = &self.records[self.current];
        if record.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        let selected = record.selected.ok_or(SessionError::NoSelection)?;

        let question = &self.questions[self.current];
        let feedback = if question.is_correct(selected) {
            self.score += 1;
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                correct_text: question.correct_text().to_string(),
            }
        };

        self.records[self.current].feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// 进入下一题，需要先提交当前题
    pub fn next(&mut self) -> Result<(), SessionError> {
        if !self.current_record().is_submitted() {
            return Err(SessionError::NotSubmitted);
        }
        if self.is_last() {
            return Err(SessionError::NoNextQuestion);
        }
        self.current += 1;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), SessionError> {
        if self.current == 0 {
            return Err(SessionError::NoPreviousQuestion);
        }
        self.current -= 1;
        Ok(())
    }

    /// 最后一题已提交时才能结束
    pub fn can_finish(&self) -> bool {
        self.is_last() && self.current_record().is_submitted()
    }

    pub fn finish(&self) -> Result<QuizSummary, SessionError> {
        if !self.can_finish() {
            return Err(SessionError::NotFinished);
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> QuizSummary {
        let total = self.questions.len();
        if self.score == total {
            QuizSummary::Perfect
        } else if self.score * 2 >= total {
            QuizSummary::Good
        } else {
            QuizSummary::TryAgain
        }
    }
}
