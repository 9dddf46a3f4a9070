// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gemini client for plate recognition via the `generateContent` API

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::analyzer::PlateAnalyzer;
use super::config::RecognitionConfig;
use super::types::{AnalysisError, RecognitionOutcome};
use crate::vision::ImagePayload;

const PLATE_PROMPT: &str = "你是一位精通 MATLAB 的车牌识别 (LPR) 专家。
你的任务是分析提供的图像（图像可能受雾天干扰），并模拟专业去雾识别管线的输出。
1. 识别车牌号码（如：京A88888）。
2. 识别车辆或车牌颜色，并用中文回答（如：蓝、黄、绿、白、黑）。
3. 提供置信度评分 (0-1)。
4. 以严格的 JSON 格式返回数据。

如果图像因雾气太重无法看清，请基于你内部通过暗原色先验 (DCP) 逻辑计算出的“去雾”版本提供最佳推测结果。";

/// Upper bound on upstream error text kept in an `AnalysisError::Api`
const MAX_ERROR_MESSAGE_CHARS: usize = 512;

// --- generateContent serde structs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Shape the model is asked to answer with
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlateAnswer {
    plate_number: String,
    color: String,
    confidence: f64,
    #[serde(default)]
    summary: Option<String>,
}

fn plate_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "plateNumber": { "type": "STRING" },
            "color": { "type": "STRING" },
            "confidence": { "type": "NUMBER" },
            "summary": { "type": "STRING" }
        },
        "required": ["plateNumber", "color", "confidence"]
    })
}

/// Client for the Gemini vision API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model_name: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// The API key is not checked here; a missing key fails the first call.
    pub fn new(config: &RecognitionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Gemini client configured: endpoint={}, model={}, timeout={}ms",
            endpoint, config.model, config.request_timeout_ms
        );

        Ok(Self {
            client,
            endpoint,
            model_name: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout_ms: config.request_timeout_ms,
        })
    }

    /// Get the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.endpoint, self.model_name)
    }

    /// Check that the service accepts our key and knows the model
    pub async fn health_check(&self) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Gemini health check skipped: no API key");
            return false;
        };

        match self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", api_key)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Gemini health check failed: {}", e);
                false
            }
        }
    }

    fn build_request(image: &ImagePayload) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: serde_json::json!([
                    { "text": PLATE_PROMPT },
                    {
                        "inlineData": {
                            "mimeType": image.mime_type(),
                            "data": image.to_base64()
                        }
                    }
                ]),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: plate_response_schema(),
            },
        }
    }

    fn map_transport_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            AnalysisError::Transport(e.to_string())
        }
    }
}

/// Reduce an error body to the service's `error.message`, or a bounded prefix of it
fn api_error_message(body: &str) -> String {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if message.chars().count() <= MAX_ERROR_MESSAGE_CHARS {
        return message;
    }
    let mut truncated: String = message.chars().take(MAX_ERROR_MESSAGE_CHARS).collect();
    truncated.push_str("...");
    truncated
}

/// Extract and strictly parse the plate answer from a `generateContent` body
fn parse_generate_content(body: &str) -> Result<RecognitionOutcome, AnalysisError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::InvalidResponse(format!("JSON parse error: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidResponse(
            "response contained no candidate text".to_string(),
        ));
    }

    let answer: PlateAnswer = serde_json::from_str(&text)
        .map_err(|e| AnalysisError::InvalidResponse(format!("schema mismatch: {}", e)))?;

    Ok(RecognitionOutcome {
        plate_number: Some(answer.plate_number),
        color: Some(answer.color),
        confidence: Some(answer.confidence),
        summary: answer.summary,
    })
}

#[async_trait]
impl PlateAnalyzer for GeminiClient {
    async fn analyze(&self, image: &ImagePayload) -> Result<RecognitionOutcome, AnalysisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnalysisError::MissingCredential)?;

        let request = Self::build_request(image);
        debug!(
            "Sending {} bytes ({}) to {}",
            image.size_bytes(),
            image.mime_type(),
            self.model_name
        );

        let response = self
            .client
            .post(format!("{}:generateContent", self.model_url()))
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        parse_generate_content(&body)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
