use crate::history::ChatHistoryWindow;
use crate::persona::SYSTEM_PROMPT;
use crate::upstream::Turn;

/// Outbound turn list: persona, then history in order, then the new message.
pub fn build_messages(history: &ChatHistoryWindow, message: &str) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(Turn::system(SYSTEM_PROMPT));
    turns.extend(history.iter().map(Turn::from));
    turns.push(Turn::user(message));
    turns
}
