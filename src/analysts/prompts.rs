//! Prompt pairs for the startup analysis tasks.
//!
//! Each builder returns the `(system, user)` texts for one completion call.
//! Every system prompt asks for a JSON object so responses parse into the
//! structured mappings the report is assembled from.

use serde_json::Value;

/// A system/user prompt pair for one completion call.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Parse freeform startup text into a structured record.
pub fn parse_record(startup_text: &str) -> PromptPair {
    PromptPair::new(
        "Parse freeform startup text into a JSON record. Return only fields you can infer: \
         name, description, market_size, growth_rate, competition, market_trends, \
         product_details, technology_stack, product_fit, founder_backgrounds, track_records, \
         leadership_skills, vision_alignment.",
        format!("Parse this startup description into JSON fields:\n{startup_text}"),
    )
}

/// Full scout evaluation.
pub fn evaluate(startup_info: &Value, mode: &str) -> PromptPair {
    PromptPair::new(
        "You are a VC scout. Return JSON with keys: market_opportunity, product_innovation, \
         founding_team, potential_risks, overall_potential (1-10), \
         investment_recommendation (Invest/Pass), confidence (0-1), rationale.",
        format!(
            "Evaluate this startup qualitatively as a scout.\n\n\
             Startup info:\n{startup_info}\n\nMode: {mode}"
        ),
    )
}

/// Quick categorical screen.
pub fn quick_screen(startup_info: &Value) -> PromptPair {
    PromptPair::new(
        "Produce a categorical assessment for quick screening. Return JSON with keys: \
         industry_growth (Yes/No/N/A), market_size (Small/Medium/Large/N/A), \
         development_pace (Slower/Same/Faster/N/A), \
         market_adaptability (Not Adaptable/Somewhat Adaptable/Very Adaptable/N/A), \
         execution_capabilities (Poor/Average/Excellent/N/A), \
         funding_amount (Below Average/Average/Above Average/N/A), \
         valuation_change (Decreased/Remained Stable/Increased/N/A), \
         investor_backing (Unknown/Recognized/Highly Regarded/N/A), \
         reviews_testimonials (Negative/Mixed/Positive/N/A), \
         product_market_fit (Weak/Moderate/Strong/N/A), \
         sentiment_analysis (Negative/Neutral/Positive/N/A), \
         innovation_mentions (Rarely/Sometimes/Often/N/A), \
         cutting_edge_technology (No/Mentioned/Emphasized/N/A), \
         timing (Too Early/Just Right/Too Late/N/A), \
         prediction (Successful/Unsuccessful).",
        format!("Categorize this startup quickly based on info:\n{startup_info}"),
    )
}

/// Market analysis.
pub fn market(startup_info: &Value, mode: &str) -> PromptPair {
    PromptPair::new(
        "You are an experienced market analyst. Return JSON with keys: \
         market_size, growth_rate, competition, market_trends, viability_score (1-10).",
        format!(
            "Analyze the startup's market qualitatively based on this info. \
             Be concise but specific.\n\nStartup info:\n{startup_info}\n\nMode: {mode}"
        ),
    )
}

/// Product analysis.
pub fn product(startup_info: &Value, mode: &str) -> PromptPair {
    PromptPair::new(
        "You are a senior product analyst. Return JSON with keys: \
         features_analysis, tech_stack_evaluation, usp_assessment, \
         potential_score (1-10), innovation_score (1-10), market_fit_score (1-10).",
        format!(
            "Analyze the startup's product qualitatively based on this info. \
             Include concrete justifications.\n\nStartup info:\n{startup_info}\n\nMode: {mode}"
        ),
    )
}

/// Founding team analysis.
pub fn founders(startup_info: &Value, mode: &str) -> PromptPair {
    PromptPair::new(
        "You are a venture partner evaluating founders. Return JSON with keys: \
         competency_score (1-10), analysis.",
        format!(
            "Assess the founding team qualitatively based on the info. Give a numeric \
             competency_score and a detailed analysis.\n\n\
             Startup info:\n{startup_info}\n\nMode: {mode}"
        ),
    )
}

/// Founder segmentation into L1-L5.
pub fn segmentation(founder_info: &Value) -> PromptPair {
    PromptPair::new(
        "You categorize founders into L1-L5 based on track record and capabilities. \
         Return JSON with key: segmentation (one of L1, L2, L3, L4, L5).",
        format!("Segment the founder/team based on the info:\n{founder_info}"),
    )
}

/// Founder-idea fit estimate.
pub fn idea_fit(startup_info: &Value, founder_info: &Value) -> PromptPair {
    PromptPair::new(
        "Estimate a qualitative founder-idea fit. Return JSON with keys: \
         idea_fit (float between 0 and 1), cosine_similarity (float between 0 and 1). \
         If you cannot compute exact similarity, produce a reasoned estimate.",
        format!(
            "Given the startup and founder info, estimate compatibility and include brief \
             rationale inside a 'rationale' field.\n\n\
             Startup info:\n{startup_info}\n\nFounder info:\n{founder_info}"
        ),
    )
}

/// Integrated analysis across all signals.
pub fn integration(
    market_info: &Value,
    product_info: &Value,
    founder_info: &Value,
    founder_idea_fit: &Value,
    founder_segmentation: &Value,
    prediction: &Value,
) -> PromptPair {
    PromptPair::new(
        "You are the chief analyst. Return JSON with keys: overall_score (1-10), \
         IntegratedAnalysis, recommendation, outcome. Consider all provided signals but \
         don't over-index on any single one.",
        format!(
            "Integrate the following into a professional qualitative assessment including an \
             overall_score and recommendation.\n\n\
             Market Info:\n{market_info}\n\nProduct Info:\n{product_info}\n\n\
             Founder Info:\n{founder_info}\n\nFounder-Idea Fit:\n{founder_idea_fit}\n\n\
             Founder Segmentation:\n{founder_segmentation}\n\nModel Prediction:\n{prediction}"
        ),
    )
}

/// Final quantitative decision.
pub fn decision(
    prediction: &Value,
    founder_idea_fit: &Value,
    founder_segmentation: &Value,
) -> PromptPair {
    PromptPair::new(
        "Make a final qualitative decision based on the signals. Return JSON with keys: \
         outcome (Successful/Unsuccessful), probability (0-1), reasoning.",
        format!(
            "Use these inputs to make a decision; be consistent and realistic about \
             probability.\n\n\
             Model Prediction: {prediction}\n\
             Founder-Idea Fit: {founder_idea_fit}\n\
             Founder Segmentation: {founder_segmentation}"
        ),
    )
}
