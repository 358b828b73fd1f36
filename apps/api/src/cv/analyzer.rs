//! CV analysis: turns a CV (text, image or PDF) plus a budget into structured
//! study-abroad recommendations.
//!
//! Flow: resolve CV source → budget tier + strategy → prompt → one model call →
//! response extractor → payload. Model failures come back as `{"error": ...}`
//! records, never as errors.

use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::budget::{Budget, BudgetThresholds, ExchangeRates};
use crate::cv::document::{image_attachment, is_blank, pdf_attachment, DocumentTextExtractor};
use crate::cv::prompts::{
    CV_ANALYSIS_PROMPT, CV_ATTACHMENT_SOURCE, CV_SCHOLARSHIP_TIMELINE_PROMPT, CV_TEXT_SOURCE,
};
use crate::errors::ServiceFault;
use crate::llm_client::extract::extract;
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionGateway, CompletionRequest};
use crate::models::cv::CvInput;
use crate::timeline::DATE_FORMAT;

const ANALYSIS_ACTION: &str = "CV analysis";
const TIMELINE_ACTION: &str = "Scholarship timeline";

#[derive(Debug, Error, PartialEq)]
pub enum CvError {
    #[error("Unsupported image content: expected a PNG or JPEG file")]
    UnreadableImage,
}

pub struct CvAnalyzer {
    llm: Arc<dyn CompletionGateway>,
    text_extractor: Arc<dyn DocumentTextExtractor>,
    thresholds: BudgetThresholds,
    rates: ExchangeRates,
}

impl CvAnalyzer {
    pub fn new(
        llm: Arc<dyn CompletionGateway>,
        text_extractor: Arc<dyn DocumentTextExtractor>,
        thresholds: BudgetThresholds,
        rates: ExchangeRates,
    ) -> Self {
        Self {
            llm,
            text_extractor,
            thresholds,
            rates,
        }
    }

    /// Dispatches on the kind of CV received.
    pub async fn analyze(
        &self,
        input: CvInput,
        budget: Budget,
        today: NaiveDate,
    ) -> Result<Value, CvError> {
        match input {
            CvInput::Text(text) => Ok(self.analyze_text(&text, budget, today).await),
            CvInput::Pdf(pdf) => Ok(self.analyze_pdf(pdf, budget, today).await),
            CvInput::Image(image) => self.analyze_image(image, budget, today).await,
        }
    }

    pub async fn analyze_text(&self, cv_text: &str, budget: Budget, today: NaiveDate) -> Value {
        info!(
            "Analyzing CV text ({} chars), budget tier {}",
            cv_text.len(),
            budget.tier(&self.thresholds)
        );
        let source = render(CV_TEXT_SOURCE, &[("cv_text", cv_text)]);
        let prompt = self.analysis_prompt(&source, budget, today);
        self.complete_document(CompletionRequest::text(prompt), ANALYSIS_ACTION)
            .await
    }

    pub async fn analyze_image(
        &self,
        image: Bytes,
        budget: Budget,
        today: NaiveDate,
    ) -> Result<Value, CvError> {
        let attachment = image_attachment(image).ok_or(CvError::UnreadableImage)?;
        info!(
            "Analyzing CV image ({}, {} bytes), budget tier {}",
            attachment.mime_type,
            attachment.data.len(),
            budget.tier(&self.thresholds)
        );
        let prompt = self.analysis_prompt(CV_ATTACHMENT_SOURCE, budget, today);
        Ok(self
            .complete_document(
                CompletionRequest::with_attachment(prompt, attachment),
                ANALYSIS_ACTION,
            )
            .await)
    }

    /// Extracts the PDF's text; when nothing usable comes out, sends the PDF itself.
    pub async fn analyze_pdf(&self, pdf: Bytes, budget: Budget, today: NaiveDate) -> Value {
        let text = self.text_extractor.extract_text(pdf.clone()).await;
        if !is_blank(&text) {
            return self.analyze_text(&text, budget, today).await;
        }

        warn!(
            "No text extracted from PDF ({} bytes), falling back to attachment",
            pdf.len()
        );
        let prompt = self.analysis_prompt(CV_ATTACHMENT_SOURCE, budget, today);
        self.complete_document(
            CompletionRequest::with_attachment(prompt, pdf_attachment(pdf)),
            ANALYSIS_ACTION,
        )
        .await
    }

    /// Scholarship timeline across a set of target countries.
    pub async fn scholarship_timeline(
        &self,
        countries: &[String],
        field: Option<&str>,
        budget_limit: Option<f64>,
        today: NaiveDate,
    ) -> Value {
        let countries = if countries.is_empty() {
            "any country open to Indonesian students".to_string()
        } else {
            countries.join(", ")
        };
        info!("Building scholarship timeline for {countries}");

        let budget_section =
            Budget::new(budget_limit, None).prompt_section(&self.thresholds, &self.rates);
        let current_date = today.format(DATE_FORMAT).to_string();
        let prompt = render(
            CV_SCHOLARSHIP_TIMELINE_PROMPT,
            &[
                ("current_date", current_date.as_str()),
                ("countries", countries.as_str()),
                ("field", field.unwrap_or("any")),
                ("budget_section", budget_section.as_str()),
            ],
        );

        self.complete_document(
            CompletionRequest::text(format!("{prompt}\n{JSON_ONLY_INSTRUCTION}")),
            TIMELINE_ACTION,
        )
        .await
    }

    fn analysis_prompt(&self, cv_source: &str, budget: Budget, today: NaiveDate) -> String {
        let budget_section = budget.prompt_section(&self.thresholds, &self.rates);
        let current_date = today.format(DATE_FORMAT).to_string();
        let prompt = render(
            CV_ANALYSIS_PROMPT,
            &[
                ("current_date", current_date.as_str()),
                ("budget_section", budget_section.as_str()),
                ("cv_source", cv_source),
            ],
        );
        format!("{prompt}\n{JSON_ONLY_INSTRUCTION}")
    }

    async fn complete_document(&self, request: CompletionRequest, action: &str) -> Value {
        self.try_complete_document(request)
            .await
            .unwrap_or_else(|fault| fault.into_record(action))
    }

    async fn try_complete_document(&self, request: CompletionRequest) -> Result<Value, ServiceFault> {
        let raw = self.llm.complete(request).await?;
        let extracted = extract(&raw);
        if !extracted.is_document() {
            warn!("Model reply was not a JSON object ({} chars)", raw.len());
        }
        Ok(extracted.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::document::testing::FixedTextExtractor;
    use crate::cv::document::PDF_MIME_TYPE;
    use crate::llm_client::testing::ScriptedGateway;
    use serde_json::json;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn analyzer(gateway: Arc<ScriptedGateway>, pdf_text: &str) -> CvAnalyzer {
        CvAnalyzer::new(
            gateway,
            Arc::new(FixedTextExtractor(pdf_text.to_string())),
            BudgetThresholds::default(),
            ExchangeRates::default(),
        )
    }

    #[tokio::test]
    async fn test_text_analysis_returns_extracted_document() {
        let gateway = Arc::new(ScriptedGateway::replying(
            "```json\n{\"academic_analysis\": \"solid\"}\n```",
        ));
        let result = analyzer(gateway.clone(), "")
            .analyze_text("Jane Doe, BSc Physics", Budget::new(None, Some(5_000_000.0)), today())
            .await;

        assert_eq!(result, json!({"academic_analysis": "solid"}));
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("CV Content:\nJane Doe, BSc Physics"));
        assert!(prompt.contains("Budget tier: low"));
        assert!(prompt.contains("Current date: 2025-07-01"));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_completion_is_error_record() {
        let gateway = Arc::new(ScriptedGateway::replying("Sorry, I can't read that."));
        let result = analyzer(gateway, "")
            .analyze_text("cv", Budget::default(), today())
            .await;
        assert_eq!(
            result,
            json!({"error": "Failed to parse AI response", "raw_response": "Sorry, I can't read that."})
        );
    }

    #[tokio::test]
    async fn test_gateway_fault_is_error_record() {
        let gateway = Arc::new(ScriptedGateway::failing("quota exceeded"));
        let result = analyzer(gateway.clone(), "")
            .analyze_text("cv", Budget::default(), today())
            .await;
        assert_eq!(
            result,
            json!({"error": "CV analysis error: API error (status 503): quota exceeded"})
        );
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_pdf_with_text_is_analyzed_as_text() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        analyzer(gateway.clone(), "Extracted CV body")
            .analyze_pdf(Bytes::from_static(b"%PDF"), Budget::default(), today())
            .await;

        let request = &gateway.requests()[0];
        assert!(request.attachment.is_none());
        assert!(request.prompt.contains("Extracted CV body"));
    }

    #[tokio::test]
    async fn test_pdf_without_text_falls_back_to_attachment() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        analyzer(gateway.clone(), "  \n ")
            .analyze_pdf(Bytes::from_static(b"%PDF-scan"), Budget::default(), today())
            .await;

        let request = &gateway.requests()[0];
        let attachment = request.attachment.as_ref().unwrap();
        assert_eq!(attachment.mime_type, PDF_MIME_TYPE);
        assert_eq!(attachment.data.as_ref(), b"%PDF-scan");
        assert!(request.prompt.contains(CV_ATTACHMENT_SOURCE));
    }

    #[tokio::test]
    async fn test_image_is_sent_as_attachment() {
        let gateway = Arc::new(ScriptedGateway::replying("{\"ok\": true}"));
        let result = analyzer(gateway.clone(), "")
            .analyze(
                CvInput::Image(Bytes::from_static(PNG_MAGIC)),
                Budget::default(),
                today(),
            )
            .await
            .unwrap();

        assert_eq!(result, json!({"ok": true}));
        let request = &gateway.requests()[0];
        assert_eq!(request.attachment.as_ref().unwrap().mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_non_image_bytes_are_rejected_without_calling_model() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        let result = analyzer(gateway.clone(), "")
            .analyze(
                CvInput::Image(Bytes::from_static(b"GIF89a")),
                Budget::default(),
                today(),
            )
            .await;
        assert_eq!(result, Err(CvError::UnreadableImage));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scholarship_timeline_prompt() {
        let gateway = Arc::new(ScriptedGateway::replying("{\"scholarships\": []}"));
        let countries = vec!["Germany".to_string(), "Australia".to_string()];
        let result = analyzer(gateway.clone(), "")
            .scholarship_timeline(&countries, Some("Computer Science"), Some(50_000_000.0), today())
            .await;

        assert_eq!(result, json!({"scholarships": []}));
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Target countries: Germany, Australia"));
        assert!(prompt.contains("Field of study: Computer Science"));
        assert!(prompt.contains("Total budget: Rp 50.000.000"));
    }

    #[tokio::test]
    async fn test_scholarship_timeline_defaults() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        analyzer(gateway.clone(), "")
            .scholarship_timeline(&[], None, None, today())
            .await;
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Target countries: any country open to Indonesian students"));
        assert!(prompt.contains("Field of study: any"));
    }
}
