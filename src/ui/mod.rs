pub mod terminal;

use crate::models::chat::Message;

/// Observer of message-store mutations. Implementations re-render whatever
/// changed; the store itself stays the source of truth.
pub trait ChatView {
    fn message_appended(&mut self, message: &Message);

    fn last_replaced(&mut self, previous: &Message, current: &Message);

    fn busy_changed(&mut self, _busy: bool) {}

    fn exchange_finished(&mut self) {}

    fn notice(&mut self, _text: &str) {}
}
