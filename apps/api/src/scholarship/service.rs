//! Scholarship planning: timelines anchored to a departure date, per-university
//! scholarship lookups and criteria search.
//!
//! Date arithmetic happens here, not in the model. A malformed departure date
//! becomes an error record before any model call is made.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::budget::{Budget, BudgetThresholds, ExchangeRates};
use crate::errors::ServiceFault;
use crate::llm_client::extract::extract;
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionGateway, CompletionRequest};
use crate::scholarship::prompts::{
    PREPARATION_TIMELINE_PROMPT, SCHOLARSHIP_SEARCH_PROMPT, SCHOLARSHIP_TIMELINE_PROMPT,
    UNIVERSITY_SCHOLARSHIPS_PROMPT,
};
use crate::timeline::{
    backward_schedule, days_until, parse_departure_date, schedule_prompt_lines, DepartureWindow,
    DATE_FORMAT, DEFAULT_PHASES,
};

const TIMELINE_ACTION: &str = "Scholarship timeline";
const UNIVERSITY_ACTION: &str = "University scholarships";
const PREPARATION_ACTION: &str = "Timeline calculation";
const SEARCH_ACTION: &str = "Scholarship search";

pub struct ScholarshipService {
    llm: Arc<dyn CompletionGateway>,
    thresholds: BudgetThresholds,
    rates: ExchangeRates,
}

impl ScholarshipService {
    pub fn new(
        llm: Arc<dyn CompletionGateway>,
        thresholds: BudgetThresholds,
        rates: ExchangeRates,
    ) -> Self {
        Self {
            llm,
            thresholds,
            rates,
        }
    }

    pub async fn timeline(
        &self,
        university: &str,
        user_country: &str,
        departure_date: &str,
        field: Option<&str>,
        budget_limit: Option<f64>,
        today: NaiveDate,
    ) -> Value {
        self.try_timeline(university, user_country, departure_date, field, budget_limit, today)
            .await
            .unwrap_or_else(|fault| fault.into_record(TIMELINE_ACTION))
    }

    async fn try_timeline(
        &self,
        university: &str,
        user_country: &str,
        departure_date: &str,
        field: Option<&str>,
        budget_limit: Option<f64>,
        today: NaiveDate,
    ) -> Result<Value, ServiceFault> {
        let departure = parse_departure_date(departure_date)?;
        let days = days_until(departure, today);
        info!("Scholarship timeline for {university}: {days} days until departure");

        let budget_section =
            Budget::new(budget_limit, None).prompt_section(&self.thresholds, &self.rates);
        let prompt = render(
            SCHOLARSHIP_TIMELINE_PROMPT,
            &[
                ("current_date", today.format(DATE_FORMAT).to_string().as_str()),
                ("university", university),
                ("user_country", user_country),
                ("departure_date", departure.format(DATE_FORMAT).to_string().as_str()),
                ("days_until_departure", days.to_string().as_str()),
                ("field", field.unwrap_or("any")),
                ("budget_section", budget_section.as_str()),
                ("window_note", DepartureWindow::classify(days).describe()),
            ],
        );
        self.complete_document(prompt).await
    }

    pub async fn university_scholarships(
        &self,
        university: &str,
        field: Option<&str>,
        today: NaiveDate,
    ) -> Value {
        info!("Looking up scholarships at {university}");
        let prompt = render(
            UNIVERSITY_SCHOLARSHIPS_PROMPT,
            &[
                ("current_date", today.format(DATE_FORMAT).to_string().as_str()),
                ("university", university),
                ("field", field.unwrap_or("any")),
            ],
        );
        self.complete_document(prompt)
            .await
            .unwrap_or_else(|fault| fault.into_record(UNIVERSITY_ACTION))
    }

    /// Backward-scheduled preparation plan. The day count and the milestone
    /// dates are computed here and handed to the model as anchors.
    pub async fn preparation_timeline(
        &self,
        departure_date: &str,
        user_country: &str,
        today: NaiveDate,
    ) -> Value {
        self.try_preparation_timeline(departure_date, user_country, today)
            .await
            .unwrap_or_else(|fault| fault.into_record(PREPARATION_ACTION))
    }

    async fn try_preparation_timeline(
        &self,
        departure_date: &str,
        user_country: &str,
        today: NaiveDate,
    ) -> Result<Value, ServiceFault> {
        let departure = parse_departure_date(departure_date)?;
        let days = days_until(departure, today);
        let window = DepartureWindow::classify(days);
        info!("Preparation timeline: {days} days until departure ({window:?})");

        let schedule = backward_schedule(departure, DEFAULT_PHASES);
        let milestones = schedule_prompt_lines(&schedule, today);
        let prompt = render(
            PREPARATION_TIMELINE_PROMPT,
            &[
                ("current_date", today.format(DATE_FORMAT).to_string().as_str()),
                ("departure_date", departure.format(DATE_FORMAT).to_string().as_str()),
                ("days_until_departure", days.to_string().as_str()),
                ("user_country", user_country),
                ("window_note", window.describe()),
                ("milestones", milestones.as_str()),
            ],
        );
        self.complete_document(prompt).await
    }

    pub async fn search(
        &self,
        field: Option<&str>,
        target_countries: &[String],
        budget_limit: Option<f64>,
        user_country: &str,
        today: NaiveDate,
    ) -> Value {
        let countries = if target_countries.is_empty() {
            "any country".to_string()
        } else {
            target_countries.join(", ")
        };
        info!("Searching scholarships in {countries} for students from {user_country}");

        let budget_section =
            Budget::new(budget_limit, None).prompt_section(&self.thresholds, &self.rates);
        let prompt = render(
            SCHOLARSHIP_SEARCH_PROMPT,
            &[
                ("current_date", today.format(DATE_FORMAT).to_string().as_str()),
                ("user_country", user_country),
                ("field", field.unwrap_or("any")),
                ("countries", countries.as_str()),
                ("budget_section", budget_section.as_str()),
            ],
        );
        self.complete_document(prompt)
            .await
            .unwrap_or_else(|fault| fault.into_record(SEARCH_ACTION))
    }

    async fn complete_document(&self, prompt: String) -> Result<Value, ServiceFault> {
        let request = CompletionRequest::text(format!("{prompt}\n{JSON_ONLY_INSTRUCTION}"));
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
    use crate::llm_client::testing::ScriptedGateway;
    use serde_json::json;

    fn service(gateway: Arc<ScriptedGateway>) -> ScholarshipService {
        ScholarshipService::new(
            gateway,
            BudgetThresholds::default(),
            ExchangeRates::default(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_departure_date_is_error_record() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        let result = service(gateway.clone())
            .preparation_timeline("not-a-date", "Indonesia", today())
            .await;
        assert_eq!(
            result,
            json!({"error": "Timeline calculation error: invalid date format 'not-a-date', expected YYYY-MM-DD"})
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_preparation_timeline_injects_day_count_and_milestones() {
        let gateway = Arc::new(ScriptedGateway::replying(
            "```json\n{\"timeline_analysis\": {\"total_preparation_time\": \"62 days\"}}\n```",
        ));
        let result = service(gateway.clone())
            .preparation_timeline("2025-09-01", "Indonesia", today())
            .await;

        assert_eq!(
            result,
            json!({"timeline_analysis": {"total_preparation_time": "62 days"}})
        );
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Days until departure: 62"));
        assert!(prompt.contains("\"total_preparation_time\": \"62 days\""));
        assert!(prompt.contains(DepartureWindow::Tight.describe()));
        assert!(prompt.contains("- departure/travel: 2025-09-01 (0 days before departure)"));
        assert!(prompt.contains(
            "- visa application submission: 2025-07-03 (60 days before departure)"
        ));
        assert!(prompt.contains(
            "- application submissions: 2025-02-03 (210 days before departure) (already overdue)"
        ));
    }

    #[tokio::test]
    async fn test_passed_departure_date_is_flagged() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        service(gateway.clone())
            .preparation_timeline("2025-06-01", "Indonesia", today())
            .await;
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Days until departure: -30"));
        assert!(prompt.contains(DepartureWindow::Passed.describe()));
    }

    #[tokio::test]
    async fn test_timeline_prompt_and_defaults() {
        let gateway = Arc::new(ScriptedGateway::replying("{\"available_scholarships\": []}"));
        let result = service(gateway.clone())
            .timeline(
                "Technical University of Munich",
                "Indonesia",
                "2026-09-01",
                None,
                Some(500_000_000.0),
                today(),
            )
            .await;

        assert_eq!(result, json!({"available_scholarships": []}));
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Target university: Technical University of Munich"));
        assert!(prompt.contains("Field of study: any"));
        assert!(prompt.contains("Total budget: Rp 500.000.000"));
        assert!(prompt.contains("Days until departure: 427"));
        assert!(prompt.contains(DepartureWindow::Adequate.describe()));
        assert!(prompt.ends_with(JSON_ONLY_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_timeline_invalid_date_uses_timeline_action() {
        let gateway = Arc::new(ScriptedGateway::replying("{}"));
        let result = service(gateway)
            .timeline("ITB", "Indonesia", "01/09/2025", None, None, today())
            .await;
        assert_eq!(
            result,
            json!({"error": "Scholarship timeline error: invalid date format '01/09/2025', expected YYYY-MM-DD"})
        );
    }

    #[tokio::test]
    async fn test_university_scholarships_parse_failure() {
        let gateway = Arc::new(ScriptedGateway::replying("I am not sure."));
        let result = service(gateway)
            .university_scholarships("NUS", Some("Law"), today())
            .await;
        assert_eq!(
            result,
            json!({"error": "Failed to parse AI response", "raw_response": "I am not sure."})
        );
    }

    #[tokio::test]
    async fn test_search_gateway_failure_and_defaults() {
        let gateway = Arc::new(ScriptedGateway::failing("rate limited"));
        let result = service(gateway.clone())
            .search(None, &[], None, "Indonesia", today())
            .await;
        assert_eq!(
            result,
            json!({"error": "Scholarship search error: API error (status 503): rate limited"})
        );

        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Target countries: any country"));
        assert!(prompt.contains("Student nationality: Indonesia"));
        assert!(prompt.contains("Total budget: not specified"));
    }

    #[tokio::test]
    async fn test_search_lists_countries() {
        let gateway = Arc::new(ScriptedGateway::replying("{\"scholarships\": []}"));
        let countries = vec!["Japan".to_string(), "Korea".to_string()];
        service(gateway.clone())
            .search(Some("Engineering"), &countries, None, "Malaysia", today())
            .await;
        let prompt = gateway.last_prompt();
        assert!(prompt.contains("Target countries: Japan, Korea"));
        assert!(prompt.contains("Field of study: Engineering"));
        assert!(prompt.contains("students from Malaysia"));
    }
}
