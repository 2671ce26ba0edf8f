//! Ordered reply emission.

/// Receives a handler's spoken replies in the order they are produced.
///
/// A handler may call [`ReplySink::say`] more than once; each call is a
/// separate assistant turn and is delivered before the handler continues,
/// so an acknowledgement can be spoken while a slow lookup is still running.
pub trait ReplySink: Send {
    fn say(&mut self, text: String);
}

impl ReplySink for Vec<String> {
    fn say(&mut self, text: String) {
        self.push(text);
    }
}
