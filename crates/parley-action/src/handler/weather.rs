//! Weather handler.
//!
//! Two replies per request: an acknowledgement before the lookup starts,
//! then either the summary or a fixed apology.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::error::WeatherError;
use crate::handler::IntentHandler;
use crate::reply::ReplySink;
use crate::weather::WeatherProvider;

pub const WEATHER_UNAVAILABLE: &str = "Unable to get the weather report. Please try again later.";

pub struct WeatherHandler {
    provider: Arc<dyn WeatherProvider>,
    timeout: Duration,
}

impl WeatherHandler {
    pub fn new(provider: Arc<dyn WeatherProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl IntentHandler for WeatherHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::Weather
    }

    async fn handle(&self, _intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink) {
        replies.say(format!("Getting weather for {}", ctx.city));

        let outcome = match tokio::time::timeout(self.timeout, self.provider.fetch(&ctx.city)).await
        {
            Ok(result) => result,
            Err(_) => Err(WeatherError::Timeout(self.timeout.as_millis() as u64)),
        };

        match outcome {
            Ok(report) => replies.say(report.summary(&ctx.city)),
            Err(e) => {
                tracing::warn!(city = %ctx.city, error = %e, "Weather lookup failed");
                replies.say(WEATHER_UNAVAILABLE.to_string());
            }
        }
    }

    fn describe(&self, _intent: &Intent) -> String {
        "Fetch current weather".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::{context, StubWeather};
    use crate::weather::WeatherReport;

    struct SlowWeather;

    #[async_trait]
    impl WeatherProvider for SlowWeather {
        async fn fetch(&self, _city: &str) -> Result<WeatherReport, WeatherError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(WeatherError::Request("unreachable".to_string()))
        }
    }

    async fn run(provider: Arc<dyn WeatherProvider>, timeout: Duration) -> Vec<String> {
        let handler = WeatherHandler::new(provider, timeout);
        let mut replies: Vec<String> = Vec::new();
        handler
            .handle(&Intent::Weather, &context(), &mut replies)
            .await;
        replies
    }

    #[tokio::test]
    async fn test_weather_success() {
        let replies = run(
            Arc::new(StubWeather::ok(54.5, 81.0, "light rain")),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(
            replies,
            vec![
                "Getting weather for London",
                "The temperature in London is 55 degrees Fahrenheit. The humidity is 81% and the weather is light rain.",
            ]
        );
    }

    #[tokio::test]
    async fn test_weather_failure_apologizes() {
        let replies = run(Arc::new(StubWeather::failing(500)), Duration::from_secs(5)).await;
        assert_eq!(
            replies,
            vec!["Getting weather for London", WEATHER_UNAVAILABLE]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_weather_timeout_apologizes() {
        let replies = run(Arc::new(SlowWeather), Duration::from_millis(250)).await;
        assert_eq!(
            replies,
            vec!["Getting weather for London", WEATHER_UNAVAILABLE]
        );
    }
}
