//! The conversation loop for one chat session.

use leavedesk_core::message::{ChatHistory, Role, Turn};
use tracing::{info, warn};

use crate::composer::AnswerComposer;

/// Displays the conversation after each submit.
pub trait Renderer {
    /// Called with the full history, oldest turn first.
    fn render(&mut self, turns: &[Turn]);
}

/// One turn as shown to the user.
pub fn render_turn(turn: &Turn) -> String {
    match turn.role {
        Role::User => format!("👤 **你**：{}", turn.text),
        Role::Assistant => format!("🤖 **助理**：{}", turn.text),
    }
}

/// Append the question and exactly one answer to `history`.
///
/// Blank input leaves the history untouched. A failed retrieval becomes a
/// warning answer so every question stays paired with a reply.
pub async fn on_submit(
    composer: &AnswerComposer,
    question: &str,
    mut history: ChatHistory,
) -> ChatHistory {
    if question.trim().is_empty() {
        return history;
    }

    history.push(Turn::user(question));

    let answer = match composer.compose(question).await {
        Ok(answer) => {
            info!(session = %history.id, intent = ?answer.intent, "Question answered");
            answer.text
        }
        Err(e) => {
            warn!(session = %history.id, error = %e, "Answer composition failed");
            format!("⚠️ 查詢失敗：{e}")
        }
    };

    history.push(Turn::assistant(answer));
    history
}

/// A composer, its history, and where the history is shown.
pub struct Session<R: Renderer> {
    composer: AnswerComposer,
    history: ChatHistory,
    renderer: R,
}

impl<R: Renderer> Session<R> {
    pub fn new(composer: AnswerComposer, renderer: R) -> Self {
        Self {
            composer,
            history: ChatHistory::new(),
            renderer,
        }
    }

    /// Handle one line of input and re-render.
    pub async fn submit(&mut self, question: &str) {
        let history = std::mem::take(&mut self.history);
        self.history = on_submit(&self.composer, question, history).await;
        self.renderer.render(self.history.turns());
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn composer(&self) -> &AnswerComposer {
        &self.composer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
