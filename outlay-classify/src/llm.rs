//! Language-model client for the two classification duties: vendor →
//! category and free-text question → structured intent.
//!
//! The client never computes or looks up spending data; it only labels.
//! Numeric answers always come from the aggregation engine.

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use outlay_core::{ExpenseIntent, AI_CATEGORIES, CATEGORY_OTHER};

use crate::categorizer::VendorClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    pub provider: Provider,
    pub model: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(provider: Provider, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Pick a provider from the environment, Anthropic first.
    pub fn from_env() -> Option<Self> {
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                return Some(Self::new(
                    Provider::Anthropic,
                    "claude-3-5-sonnet-latest",
                    key,
                ));
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                return Some(Self::new(Provider::OpenAI, "gpt-4o-mini", key));
            }
        }
        None
    }

    /// Synchronous completion.
    ///
    /// Callers are synchronous (the categorizer chain), but the binary runs
    /// under #[tokio::main]. If a runtime is already running, creating a
    /// nested one and calling block_on would panic, so:
    /// - inside a runtime: block_in_place + Handle::block_on
    /// - otherwise: create a runtime and block_on
    pub fn complete(&self, system: &str, user: &str) -> Result<String> {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(system, user)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete_async(system, user))
        }
    }

    async fn complete_async(&self, system: &str, user: &str) -> Result<String> {
        match self.provider {
            Provider::Anthropic => self.anthropic_complete(system, user).await,
            Provider::OpenAI => self.openai_complete(system, user).await,
        }
    }

    async fn anthropic_complete(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            max_tokens: i32,
            system: String,
            messages: Vec<Msg>,
        }

        #[derive(Deserialize)]
        struct Resp {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(rename = "type")]
            t: String,
            text: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            max_tokens: 450,
            system: system.to_string(),
            messages: vec![Msg {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::new();
        let resp = client
            .post("https://api.anthropic.com/v1/messages")
            .headers(headers)
            .json(&body)
            .send()
            .await
            .context("anthropic request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("anthropic error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse anthropic response")?;
        let mut s = String::new();
        for b in out.content {
            if b.t == "text" {
                if let Some(t) = b.text {
                    s.push_str(&t);
                }
            }
        }
        Ok(s.trim().to_string())
    }

    async fn openai_complete(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Req {
            model: String,
            messages: Vec<Msg>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: self.model.clone(),
            messages: vec![
                Msg {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Msg {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.1,
        };

        let client = reqwest::Client::new();
        let resp = client
            .post("https://api.openai.com/v1/chat/completions")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse openai response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

const VENDOR_SYSTEM: &str = "You label merchant names for an expense tracker. Reply with a single category name and nothing else.";

fn vendor_prompt(vendor: &str) -> String {
    format!(
        r#"Classify this vendor into one of these categories:
["Food", "Shopping", "Travel", "Entertainment", "Bills", "Healthcare", "Other"]

Vendor: "{vendor}"

Instructions:
- Return ONLY the category name (e.g., "Food", "Shopping", etc.)
- Do not include any explanation or additional text
- Use "Other" if the vendor doesn't clearly fit any category
- Consider common vendor patterns and business types

Category:"#
    )
}

impl VendorClassifier for LlmClient {
    fn classify_vendor(&self, vendor: &str) -> Result<String> {
        let raw = self.complete(VENDOR_SYSTEM, &vendor_prompt(vendor))?;
        let candidate = raw.trim().trim_matches('"');
        if AI_CATEGORIES.contains(&candidate) {
            Ok(candidate.to_string())
        } else {
            Ok(CATEGORY_OTHER.to_string())
        }
    }
}

const INTENT_SYSTEM: &str = "You are an expense tracker intent classifier. You only classify intent and extract entities; you never query data or compute numbers.";

fn intent_prompt(question: &str) -> String {
    format!(
        r#"Analyze the user's question and extract structured intent information.

User Question: "{question}"

Valid Intent Types (use exactly these strings):
- "TOTAL_SPEND" - Questions about total spending, overall amounts, summary
- "CATEGORY_SUMMARY" - Questions about spending in a specific category
- "CATEGORY_COMPARISON" - Questions comparing spending across categories
- "PERIOD_COMPARISON" - Questions comparing spending across time periods
- "TOP_MERCHANTS" - Questions about top vendors/merchants, where money is spent
- "DAILY_TREND" - Questions about daily spending patterns
- "MONTHLY_TREND" - Questions about monthly spending patterns
- "ANOMALY_EXPLANATION" - Questions about unusual spending, anomalies, outliers
- "BUDGET_STATUS" - Questions about budget, budget remaining, budget limits
- "GENERAL_INSIGHT" - Any other financial questions, general insights

Valid Categories (if mentioned): Food, Shopping, Travel, Entertainment, Bills, Healthcare, Amazon, Other

Valid Period Values (if mentioned, use exactly these strings):
TODAY, YESTERDAY, THIS_WEEK, LAST_WEEK, THIS_MONTH, LAST_MONTH

Return a single JSON object:
{{
  "intent_type": "<one of the valid intent types>",
  "category": "<category if mentioned, otherwise omit>",
  "period": "<period enum value if mentioned, otherwise omit>",
  "vendor": "<vendor name if mentioned, otherwise omit>",
  "amount": <numeric value if mentioned, otherwise omit>,
  "parameters": {{"category1": "...", "category2": "...", "period1": "...", "period2": "...", "months": "..."}},
  "confidence": <0.0-1.0 confidence score>
}}

Requirements:
- Return ONLY valid JSON, no explanation or additional text
- Omit optional fields entirely if not mentioned (don't use null)
- Include the parameters map only for comparison/trend intents that need it

Examples:
Question: "How much did I spend on food this month?"
Response: {{"intent_type": "CATEGORY_SUMMARY", "category": "Food", "period": "THIS_MONTH", "confidence": 0.95}}

Question: "Compare my spending last month to this month"
Response: {{"intent_type": "PERIOD_COMPARISON", "parameters": {{"period1": "LAST_MONTH", "period2": "THIS_MONTH"}}, "confidence": 0.9}}

Question: "What are my top merchants?"
Response: {{"intent_type": "TOP_MERCHANTS", "confidence": 0.95}}

Now classify this question and return the JSON:"#
    )
}

/// Turn a free-text question into a validated intent.
pub fn classify_intent(client: &LlmClient, question: &str) -> Result<ExpenseIntent> {
    let raw = client.complete(INTENT_SYSTEM, &intent_prompt(question))?;
    Ok(ExpenseIntent::from_model_response(&raw)?)
}
