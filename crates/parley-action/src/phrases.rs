//! Fixed assistant phrases that are not tied to a single intent.

use chrono::Timelike;

use crate::context::SessionContext;

/// Spoken after a capture error other than "no speech".
pub const REPROMPT: &str = "I didn't hear you, please say that again";

/// Greeting for the given hour of day: [0,12) morning, [12,18) afternoon, else evening.
pub fn greeting_for_hour(hour: u32, user_name: &str) -> String {
    let part = match hour {
        0..=11 => "Morning",
        12..=17 => "Afternoon",
        _ => "Evening",
    };
    format!("Good {}, {}!", part, user_name)
}

/// Greeting for the session's current local hour.
pub fn greeting(ctx: &SessionContext) -> String {
    greeting_for_hour(ctx.now().hour(), &ctx.user_name)
}
