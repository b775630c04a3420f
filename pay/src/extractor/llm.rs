use super::IntentExtractor;
use crate::types::{ExtractorConfig, PayError};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use voxchain_intent::{parse_extraction, PartialTransactionIntent};

const SYSTEM_PROMPT: &str = "You interpret spoken payment commands for an Avalanche wallet \
and answer with a single JSON object and nothing else.";

const PROMPT_TEMPLATE: &str = r#"Interpret this voice command and extract the transaction the user wants: {{command}}

Treat Avalanche C-Chain as the source network unless the command says otherwise.
Return a JSON object with these fields, omitting any that do not apply:
- "intent": one of "send", "swap", "stake", "unknown". Use "unknown" when the action is unclear.
- "amount": number to transact.
- "recipientAddress": target address or alias, e.g. "0xabc..." or "coffee-shop.avax".
- "recipientType": "SmartContract" when the command talks to a DeFi protocol (staking, swapping,
  providing liquidity), "EOA" for a direct transfer to a person or address, otherwise "Unknown".
- "token": token symbol such as "AVAX" or "USDC".
- "destinationChain": target network if it differs from Avalanche C-Chain, e.g. "Ethereum",
  "Polygon", "BSC", "Arbitrum", "Avalanche DFK Subnet".
- "suggestedProtocol": "CCIP" when destinationChain is outside Avalanche (Ethereum, Polygon,
  Solana, BSC, Arbitrum, Optimism); "AvalancheTeleporter" when it is another Avalanche subnet
  (DFK Subnet, Beam Subnet, Avax Subnet X); "SameChain" when there is no destinationChain or it
  is the Avalanche C-Chain itself.
- "suzakuAction": the DeFi action (for example "swap" or "stake") when the command names one
  inside the Suzaku app."#;

/// OpenAI-compatible chat completions client used for intent extraction
pub struct LlmExtractor {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl LlmExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, PayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = if config.api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").ok()
        } else {
            Some(config.api_key.clone())
        };

        if api_key.is_some() {
            info!("LLM extractor using {} at {}", config.model, config.endpoint);
        } else {
            warn!("LLM extractor created without API key - requests may be rejected");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn request_body(&self, command: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": render_prompt(command) }
            ]
        })
    }
}

#[async_trait]
impl IntentExtractor for LlmExtractor {
    async fn extract(&self, command: &str) -> Result<PartialTransactionIntent, PayError> {
        debug!("Requesting intent extraction for {:?}", command);

        let mut request = self.client.post(&self.endpoint).json(&self.request_body(command));
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PayError::Extraction("language model request timed out".to_string())
            } else {
                PayError::Extraction(format!("language model request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PayError::Extraction(format!(
                "language model returned {}: {}",
                status, body
            )));
        }

        let completion: Value = response
            .json()
            .await
            .map_err(|e| PayError::Extraction(format!("unreadable completion: {}", e)))?;

        parse_completion(&completion)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Insert the command into the prompt as a quoted JSON string
pub fn render_prompt(command: &str) -> String {
    let quoted = serde_json::to_string(command).unwrap_or_else(|_| format!("\"{}\"", command));
    PROMPT_TEMPLATE.replace("{{command}}", &quoted)
}

/// Pull the intent record out of a chat completion response
pub fn parse_completion(completion: &Value) -> Result<PartialTransactionIntent, PayError> {
    let content = completion["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| PayError::Extraction("completion has no message content".to_string()))?;

    let raw = parse_extraction(strip_code_fence(content))?;
    debug!("Extracted raw intent: {:?}", raw);
    Ok(raw)
}

/// Models sometimes wrap JSON in ```json fences
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxchain_intent::SuggestedProtocol;

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn test_render_prompt_quotes_command() {
        let prompt = render_prompt(r#"send 1 AVAX to "Bob" on Ethereum"#);
        assert!(prompt.contains(r#""send 1 AVAX to \"Bob\" on Ethereum""#));
        assert!(!prompt.contains("{{command}}"));
    }

    #[test]
    fn test_parse_plain_completion() {
        let raw = parse_completion(&completion(
            r#"{"intent":"send","amount":1,"token":"AVAX","recipientAddress":"Bob","destinationChain":"Ethereum"}"#,
        ))
        .unwrap();
        assert_eq!(raw.intent.as_deref(), Some("send"));
        assert_eq!(raw.destination_chain.as_deref(), Some("Ethereum"));
        assert_eq!(raw.suggested_protocol, None);
    }

    #[test]
    fn test_parse_fenced_completion() {
        let raw = parse_completion(&completion(
            "```json\n{\"intent\":\"stake\",\"suggestedProtocol\":\"SameChain\"}\n```",
        ))
        .unwrap();
        assert_eq!(raw.intent.as_deref(), Some("stake"));
        assert_eq!(raw.suggested_protocol, Some(SuggestedProtocol::SameChain));
    }

    #[test]
    fn test_parse_failures_are_extraction_errors() {
        let missing = parse_completion(&json!({ "choices": [] }));
        assert!(matches!(missing, Err(PayError::Extraction(_))));

        let prose = parse_completion(&completion("I think you want to send money."));
        assert!(matches!(prose, Err(PayError::Extraction(_))));

        let invalid = parse_completion(&completion(r#"{"intent":"send","amount":-4}"#));
        assert!(matches!(invalid, Err(PayError::Extraction(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let extractor = LlmExtractor::new(&ExtractorConfig {
            endpoint: "http://localhost:11434/v1/chat/completions".to_string(),
            model: "llama3".to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            temperature: 0.0,
        })
        .unwrap();

        let body = extractor.request_body("stake 5 AVAX");
        assert_eq!(body["model"], "llama3");
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("\"stake 5 AVAX\""));
        assert_eq!(extractor.name(), "llm");
    }
}
