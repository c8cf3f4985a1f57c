/// Cost-per-million-token rates for a model
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Pricing {
    /// Model identifier
    pub model: String,
    /// USD per million prompt tokens
    pub input_rate_1m: f64,
    /// USD per million completion tokens
    pub output_rate_1m: f64,
}

impl Pricing {
    /// Conservative default rates used when a model has no pricing row
    ///
    /// Pricing correctness is best-effort: a lookup failure must never
    /// block the logging path.
    pub fn fallback(model: &str) -> Self {
        Self {
            model: model.to_owned(),
            input_rate_1m: 0.15,
            output_rate_1m: 0.60,
        }
    }
}

/// Estimate request cost in USD
///
/// `prompt/1M * input_rate + completion/1M * output_rate`, rounded to
/// 6 decimal places with half-away-from-zero semantics.
pub fn estimate_cost(pricing: &Pricing, prompt_tokens: u32, completion_tokens: u32) -> f64 {
    let cost = f64::from(prompt_tokens) / 1_000_000.0 * pricing.input_rate_1m
        + f64::from(completion_tokens) / 1_000_000.0 * pricing.output_rate_1m;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

/// Rough token count for text whose usage the provider did not report
///
/// One token per four bytes, truncated. Useful for accounting on
/// failures that happen before the provider ever answers.
pub const fn approximate_tokens(text: &str) -> usize {
    text.len() / 4
}
