//! The startup report pipeline: wires analyst prompts into an analysis
//! graph and assembles the aggregate report.
//!
//! The record parse runs first since every downstream prompt reads the
//! structured record. The seven analyses then fan out as independent tasks;
//! integration and the quantitative decision fan their results back in.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::analysts::prompts::{self, PromptPair};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::Config;
use crate::domain::models::graph::{AnalysisGraph, Task};
use crate::domain::ports::CompletionError;
use crate::services::{CompletionService, Orchestrator};

/// Report mode: structured scoring or natural-language heavy output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Advanced,
    NaturalLanguage,
}

impl AnalysisMode {
    fn evaluation_mode(self) -> &'static str {
        match self {
            AnalysisMode::Advanced => "advanced",
            AnalysisMode::NaturalLanguage => "natural_language_advanced",
        }
    }
}

/// Builds and runs the startup analysis graph.
pub struct StartupAnalyzer {
    service: Arc<CompletionService>,
    orchestrator: Orchestrator,
    model: String,
    temperature: Option<f64>,
}

impl StartupAnalyzer {
    /// Create an analyzer over a shared completion service.
    pub fn new(service: Arc<CompletionService>, orchestrator: Orchestrator, config: &Config) -> Self {
        Self {
            service,
            orchestrator,
            model: config.model.clone(),
            temperature: config.completion.temperature,
        }
    }

    /// Analyze freeform startup text in structured scoring mode.
    pub async fn analyze(&self, startup_text: &str) -> DomainResult<Value> {
        self.analyze_with_mode(startup_text, AnalysisMode::Advanced)
            .await
    }

    /// Analyze freeform startup text in natural-language mode.
    pub async fn analyze_natural(&self, startup_text: &str) -> DomainResult<Value> {
        self.analyze_with_mode(startup_text, AnalysisMode::NaturalLanguage)
            .await
    }

    async fn analyze_with_mode(
        &self,
        startup_text: &str,
        mode: AnalysisMode,
    ) -> DomainResult<Value> {
        info!(?mode, "starting startup analysis");

        // Everything downstream reads the structured record, so parse first
        let startup_info = self
            .call(&prompts::parse_record(startup_text))
            .await
            .map_err(|err| DomainError::TaskFailed {
                task: "parse_record".to_string(),
                message: err.to_string(),
            })?;

        let founder_info = startup_info
            .get("founder_backgrounds")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let eval_mode = mode.evaluation_mode();

        let mut graph = AnalysisGraph::new();

        self.add_call(&mut graph, "quick_screen", prompts::quick_screen(&startup_info))?;
        self.add_call(&mut graph, "full_eval", prompts::evaluate(&startup_info, eval_mode))?;
        self.add_call(&mut graph, "market", prompts::market(&startup_info, eval_mode))?;
        self.add_call(&mut graph, "product", prompts::product(&startup_info, eval_mode))?;
        // Founder analysis always runs in structured mode
        self.add_call(&mut graph, "founders", prompts::founders(&startup_info, "advanced"))?;
        self.add_call(&mut graph, "segmentation", prompts::segmentation(&founder_info))?;

        {
            let service = Arc::clone(&self.service);
            let model = self.model.clone();
            let temperature = self.temperature;
            let pair = prompts::idea_fit(&startup_info, &founder_info);
            graph.add(Task::new("idea_fit", &[], move |_| async move {
                let mut payload = service
                    .call(&model, &pair.system, &pair.user, temperature)
                    .await?;
                // Keep cosine_similarity populated even when the model omits it
                if payload.get("cosine_similarity").is_none() {
                    let fallback = payload
                        .get("idea_fit")
                        .cloned()
                        .unwrap_or_else(|| json!(0.5));
                    if let Some(map) = payload.as_object_mut() {
                        map.insert("cosine_similarity".to_string(), fallback);
                    }
                }
                Ok(payload)
            }))?;
        }

        {
            let service = Arc::clone(&self.service);
            let model = self.model.clone();
            let temperature = self.temperature;
            graph.add(Task::new(
                "integration",
                &[
                    "market",
                    "product",
                    "founders",
                    "idea_fit",
                    "segmentation",
                    "quick_screen",
                ],
                move |inputs| async move {
                    let screen = inputs
                        .get("quick_screen")
                        .context("quick_screen result missing")?;
                    let prediction = screen.get("prediction").cloned().unwrap_or(Value::Null);
                    let pair = prompts::integration(
                        inputs.get("market").context("market result missing")?,
                        inputs.get("product").context("product result missing")?,
                        inputs.get("founders").context("founders result missing")?,
                        inputs.get("idea_fit").context("idea_fit result missing")?,
                        inputs
                            .get("segmentation")
                            .context("segmentation result missing")?,
                        &prediction,
                    );
                    Ok(service
                        .call(&model, &pair.system, &pair.user, temperature)
                        .await?)
                },
            ))?;
        }

        {
            let service = Arc::clone(&self.service);
            let model = self.model.clone();
            let temperature = self.temperature;
            graph.add(Task::new(
                "decision",
                &["quick_screen", "idea_fit", "segmentation"],
                move |inputs| async move {
                    let screen = inputs
                        .get("quick_screen")
                        .context("quick_screen result missing")?;
                    let prediction = screen.get("prediction").cloned().unwrap_or(Value::Null);
                    let pair = prompts::decision(
                        &prediction,
                        inputs.get("idea_fit").context("idea_fit result missing")?,
                        inputs
                            .get("segmentation")
                            .context("segmentation result missing")?,
                    );
                    Ok(service
                        .call(&model, &pair.system, &pair.user, temperature)
                        .await?)
                },
            ))?;
        }

        let mut results = self.orchestrator.run(graph).await?;

        let mut take = |name: &str| results.remove(name).unwrap_or(Value::Null);
        let idea_fit = take("idea_fit");
        let categorization = take("quick_screen");
        let prediction = categorization
            .get("prediction")
            .cloned()
            .unwrap_or(Value::Null);
        let founder_idea_fit = idea_fit.get("idea_fit").cloned().unwrap_or(Value::Null);

        Ok(json!({
            "Final Analysis": take("integration"),
            "Market Analysis": take("market"),
            "Product Analysis": take("product"),
            "Founder Analysis": take("founders"),
            "Founder Segmentation": take("segmentation"),
            "Founder Idea Fit": founder_idea_fit,
            "Categorical Prediction": prediction,
            "Categorization": categorization,
            "Quantitative Decision": take("decision"),
            "Startup Info": startup_info,
            "Full Evaluation": take("full_eval"),
            "Generated At": Utc::now().to_rfc3339(),
        }))
    }

    /// Register one independent completion task for a prebuilt prompt pair.
    fn add_call(
        &self,
        graph: &mut AnalysisGraph,
        name: &str,
        pair: PromptPair,
    ) -> DomainResult<()> {
        let service = Arc::clone(&self.service);
        let model = self.model.clone();
        let temperature = self.temperature;
        graph.add(Task::new(name, &[], move |_| async move {
            Ok(service
                .call(&model, &pair.system, &pair.user, temperature)
                .await?)
        }))
    }

    async fn call(&self, pair: &PromptPair) -> Result<Value, CompletionError> {
        self.service
            .call(&self.model, &pair.system, &pair.user, self.temperature)
            .await
    }
}
