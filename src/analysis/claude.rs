//! Anthropic messages API client
//!
//! Reference implementation of [`AnalysisClient`]. Prompts instruct the
//! model to answer with bare JSON; extraction still tolerates fenced or
//! prefixed output via [`crate::analysis::parse`].

use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::parse;
use crate::analysis::traits::AnalysisClient;
use crate::analysis::types::{Finding, Summary};
use crate::core::retry::{retry_async_where, RetryPolicy};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.2;

pub struct ClaudeClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl ClaudeClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!(
                    "Failed to build HTTP client with custom timeout, using default client: {}",
                    e
                );
                Client::new()
            });

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the API base URL, mainly for tests against a local server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the transport retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn messages_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), MESSAGES_PATH)
    }

    /// Single prompt/response round trip with transient-error retries
    async fn complete(&self, prompt: &str) -> AnalysisResult<String> {
        retry_async_where(
            "claude_messages",
            self.retry.clone(),
            || self.send(prompt),
            |e: &AnalysisError| e.is_transient(),
        )
        .await
    }

    async fn send(&self, prompt: &str) -> AnalysisResult<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => AnalysisError::RateLimited,
                401 | 403 => AnalysisError::Auth { message: body },
                s if s >= 500 => AnalysisError::Unavailable { message: body },
                s => AnalysisError::Request {
                    message: format!("API error {}: {}", s, body),
                },
            });
        }

        let parsed: MessagesResponse =
            response
                .json()
                .await
                .map_err(|e| AnalysisError::Request {
                    message: format!("invalid response body: {}", e),
                })?;

        let text = parsed
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AnalysisError::MalformedResponse {
                message: "response contained no text content".to_string(),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl AnalysisClient for ClaudeClient {
    async fn analyze(&self, content: &str, language_hint: &str) -> AnalysisResult<Vec<Finding>> {
        let prompt = analysis_prompt(content, language_hint);
        let text = self.complete(&prompt).await?;
        parse::extract_json(&text)
    }

    async fn summarize(&self, findings: &[Finding]) -> AnalysisResult<Summary> {
        let prompt = summary_prompt(findings);
        let text = self.complete(&prompt).await?;
        parse::extract_json(&text).map_err(|e| AnalysisError::Summarization {
            message: e.to_string(),
        })
    }
}

fn analysis_prompt(code: &str, language: &str) -> String {
    format!(
        r#"You are a cybersecurity expert. Analyze the following {language} code for security vulnerabilities.

```{language}
{code}
```

Please provide a JSON response with an array of security issues found. Each issue should have this structure:
{{
  "id": string,
  "module": "CodeAnalysis",
  "name": string,
  "description": string,
  "severity": "low" | "medium" | "high" | "critical",
  "location": string,
  "lineNumber": number,
  "code": string,
  "recommendation": string,
  "references": [string]
}}

- For each issue, provide a clear name and description
- Assign an appropriate severity level
- Specify the location (file, function, method, etc.)
- Identify the line number if possible
- Include the vulnerable code snippet
- Provide a specific recommendation to fix the issue
- Include references to security standards, best practices, or documentation
- Only include actual security issues, not code style or performance issues
- If no security issues are found, return an empty array
- Ensure your response is ONLY valid JSON, no additional text
"#
    )
}

fn summary_prompt(findings: &[Finding]) -> String {
    let mut formatted = String::new();
    for finding in findings {
        let _ = writeln!(
            formatted,
            r#"- Module: {}
  - Name: {}
  - Description: {}
  - Severity: {}
  - Location: {}
  - Line Number: {}
  - Code: {}
  - Recommendation: {}
  - References: {}
"#,
            finding.module,
            finding.name,
            finding.description,
            finding.severity,
            finding.location,
            finding
                .line_number
                .map_or_else(|| "N/A".to_string(), |n| n.to_string()),
            finding.code.as_deref().unwrap_or("N/A"),
            finding.recommendation.as_deref().unwrap_or("N/A"),
            if finding.references.is_empty() {
                "N/A".to_string()
            } else {
                finding.references.join(", ")
            },
        );
    }

    format!(
        r#"You are a cybersecurity expert. Analyze the following security scan results and provide a detailed summary.

Security Scan Results:
{formatted}

Please provide a JSON response with the following structure:
{{
  "totalIssues": number,
  "criticalCount": number,
  "highCount": number,
  "mediumCount": number,
  "lowCount": number,
  "topModules": [{{ "name": string, "count": number }}],
  "shortSummary": string,
  "detailedAnalysis": string,
  "recommendations": [string]
}}

- Count the issues by severity level
- Identify the top 3 modules with the most issues
- Provide a brief summary of the scan results (1-2 sentences)
- Provide a detailed analysis of the security issues found (2-3 paragraphs)
- Provide concrete recommendations to address the issues (at least 3)
- Ensure your response is ONLY valid JSON, no additional text
"#
    )
}

// === Messages API types ===

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod prompt_tests {
    use super::*;
    use crate::analysis::types::Severity;

    #[test]
    fn test_analysis_prompt_embeds_code_and_language() {
        let prompt = analysis_prompt("let x = 1;", "rs");
        assert!(prompt.contains("```rs\nlet x = 1;\n```"));
        assert!(prompt.contains("ONLY valid JSON"));
    }

    #[test]
    fn test_summary_prompt_lists_findings_with_fallbacks() {
        let finding = Finding {
            id: "finding-1".to_string(),
            module: "CodeAnalysis".to_string(),
            name: "Hardcoded secret".to_string(),
            description: "API key committed to source".to_string(),
            severity: Severity::High,
            location: "src/config.py".to_string(),
            line_number: None,
            code: None,
            recommendation: None,
            references: vec![],
        };

        let prompt = summary_prompt(&[finding]);
        assert!(prompt.contains("- Module: CodeAnalysis"));
        assert!(prompt.contains("- Severity: high"));
        assert!(prompt.contains("- Line Number: N/A"));
        assert!(prompt.contains("top 3 modules"));
    }
}
