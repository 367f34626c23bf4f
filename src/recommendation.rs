//! Personalized recommendation prompts and gateway client
//!
//! Assembles the prompts sent to the external AI recommendation gateway from
//! the user's profile and the current conditions. The generated text itself is
//! opaque to this crate; only the numbers and category text fed into the
//! prompt are owned here. The category is derived through [`crate::aqi::classify`]
//! so the prompt can never disagree with the dashboard's classification.

use crate::aqi::classify;
use crate::config::AirSenseConfig;
use crate::error::AirSenseError;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

/// Profile and conditions a recommendation is generated for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// User role, e.g. "outdoor_worker" or "parent"
    pub role: String,
    /// Relevant health conditions from the user profile
    pub health_conditions: Vec<String>,
    /// Display name of the user's location
    pub location_name: Option<String>,
    /// Current AQI
    pub aqi: u16,
    /// Current temperature in Celsius
    pub temperature_c: i32,
    /// Current relative humidity percentage
    pub humidity_percent: u8,
}

/// System prompt framing the gateway model as a health advisor
#[must_use]
pub fn system_prompt() -> &'static str {
    "You are an air quality health advisor. Provide concise, actionable \
     recommendations based on the user's role and current air quality \
     conditions. Be specific and practical."
}

/// Build the user prompt for a recommendation request
#[must_use]
pub fn user_prompt(request: &RecommendationRequest) -> String {
    let category = classify(request.aqi);
    let health_conditions = if request.health_conditions.is_empty() {
        "None".to_string()
    } else {
        request.health_conditions.join(", ")
    };

    format!(
        "Role: {role}\n\
         Location: {location}\n\
         Current AQI: {aqi} ({category})\n\
         Temperature: {temperature}°C\n\
         Humidity: {humidity}%\n\
         Health considerations: {health_conditions}\n\n\
         Provide 2-3 specific, actionable recommendations for this person \
         based on their role and the current air quality. Keep it concise and practical.",
        role = request.role.replace('_', " "),
        location = request.location_name.as_deref().unwrap_or("User location"),
        aqi = request.aqi,
        category = category.label(),
        temperature = request.temperature_c,
        humidity = request.humidity_percent,
    )
}

/// Client for the OpenAI-compatible recommendation gateway
pub struct RecommendationClient {
    client: Client,
    config: AirSenseConfig,
}

impl RecommendationClient {
    /// Create a new recommendation client
    pub fn new(config: AirSenseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .with_context(|| "Failed to create HTTP client")?;
        Ok(Self { client, config })
    }

    /// Generate recommendation text for the given profile and conditions
    #[instrument(skip(self, request), fields(aqi = request.aqi, role = %request.role))]
    pub fn generate(&self, request: &RecommendationRequest) -> Result<String> {
        info!("Generating recommendations for role: {}", request.role);

        let api_key = self
            .config
            .ai
            .api_key
            .as_deref()
            .ok_or_else(|| AirSenseError::config("AI gateway API key is not configured"))?;

        let url = format!("{}/chat/completions", self.config.ai.gateway_url);
        let body = gateway::ChatRequest {
            model: self.config.ai.model.clone(),
            messages: vec![
                gateway::Message {
                    role: "system".to_string(),
                    content: system_prompt().to_string(),
                },
                gateway::Message {
                    role: "user".to_string(),
                    content: user_prompt(request),
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .with_context(|| "Failed to reach AI gateway")?;

        match response.status().as_u16() {
            429 => {
                return Err(
                    AirSenseError::api("Rate limits exceeded, please try again later.").into(),
                );
            }
            402 => {
                return Err(AirSenseError::api(
                    "Payment required, please add funds to your AI gateway workspace.",
                )
                .into());
            }
            status if status >= 400 => {
                return Err(AirSenseError::api(format!("AI gateway error: {status}")).into());
            }
            _ => {}
        }

        let completion: gateway::ChatResponse = response
            .json()
            .with_context(|| "Failed to parse AI gateway response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AirSenseError::api("AI gateway returned no choices").into())
    }
}

/// OpenAI-compatible chat completions wire types
mod gateway {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct ChatRequest {
        pub model: String,
        pub messages: Vec<Message>,
    }

    #[derive(Debug, Serialize)]
    pub struct Message {
        pub role: String,
        pub content: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: ResponseMessage,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseMessage {
        pub content: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::classify;
    use rstest::rstest;

    fn request(aqi: u16) -> RecommendationRequest {
        RecommendationRequest {
            role: "outdoor_worker".to_string(),
            health_conditions: vec!["asthma".to_string()],
            location_name: Some("Berlin".to_string()),
            aqi,
            temperature_c: 22,
            humidity_percent: 55,
        }
    }

    #[test]
    fn test_user_prompt_contents() {
        let prompt = user_prompt(&request(125));
        assert!(prompt.contains("Role: outdoor worker"));
        assert!(prompt.contains("Location: Berlin"));
        assert!(prompt.contains("Current AQI: 125 (Unhealthy for Sensitive Groups)"));
        assert!(prompt.contains("Temperature: 22°C"));
        assert!(prompt.contains("Health considerations: asthma"));
    }

    #[test]
    fn test_user_prompt_defaults() {
        let mut req = request(40);
        req.location_name = None;
        req.health_conditions.clear();
        let prompt = user_prompt(&req);
        assert!(prompt.contains("Location: User location"));
        assert!(prompt.contains("Health considerations: None"));
    }

    // The prompt category must match the dashboard classifier at every
    // threshold, including Hazardous above 300.
    #[rstest]
    #[case(50)]
    #[case(51)]
    #[case(100)]
    #[case(101)]
    #[case(150)]
    #[case(151)]
    #[case(200)]
    #[case(201)]
    #[case(300)]
    #[case(301)]
    #[case(450)]
    fn test_prompt_category_matches_classifier(#[case] aqi: u16) {
        let prompt = user_prompt(&request(aqi));
        let expected = format!("Current AQI: {aqi} ({})", classify(aqi).label());
        assert!(
            prompt.contains(&expected),
            "prompt missing '{expected}': {prompt}"
        );
    }
}
