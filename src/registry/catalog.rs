//! Static model catalog.
//!
//! Populated once at compile time and never mutated. Ids are globally
//! unique short names; `full_name` is what goes on the wire.

use crate::types::{Lab, Model, ProviderKind};

pub const ANTHROPIC_LAB: Lab = Lab { name: "Anthropic", logo: "anthropic.svg" };
pub const DEEPSEEK_LAB: Lab = Lab { name: "DeepSeek", logo: "deepseek.svg" };
pub const GOOGLE_LAB: Lab = Lab { name: "Google", logo: "google.svg" };
pub const MISTRAL_LAB: Lab = Lab { name: "Mistral", logo: "mistral.svg" };
pub const MOONSHOT_LAB: Lab = Lab { name: "Moonshot", logo: "moonshot.svg" };
pub const OPENAI_LAB: Lab = Lab { name: "OpenAI", logo: "openai.svg" };
pub const QWEN_LAB: Lab = Lab { name: "Qwen", logo: "qwen.svg" };
pub const XAI_LAB: Lab = Lab { name: "xAI", logo: "xai.svg" };
pub const ZAI_LAB: Lab = Lab { name: "Z.ai", logo: "zai.svg" };

macro_rules! model {
    ($id:literal, $full:literal, $limit:expr, $provider:ident, $lab:ident) => {
        model!($id, $full, $limit, $provider, $lab, reasoning: false)
    };
    ($id:literal, $full:literal, $limit:expr, $provider:ident, $lab:ident, reasoning: $r:literal) => {
        Model {
            id: $id,
            full_name: $full,
            token_limit: $limit,
            provider: ProviderKind::$provider,
            lab: &$lab,
            org: None,
            source: None,
            reasoning_model: $r,
        }
    };
}

/// The full catalog, in publication order.
pub const MODELS: &[Model] = &[
    model!("gpt-4.1-mini", "gpt-4.1-mini", 128_000, OpenAi, OPENAI_LAB),
    model!("gpt-5-2025-08-07", "gpt-5-2025-08-07", 128_000, OpenAi, OPENAI_LAB, reasoning: true),
    model!("gpt-5-mini-2025-08-07", "gpt-5-mini-2025-08-07", 128_000, OpenAi, OPENAI_LAB, reasoning: true),
    model!("gpt-5-nano-2025-08-07", "gpt-5-nano-2025-08-07", 128_000, OpenAi, OPENAI_LAB, reasoning: true),
    model!("gpt-5.1-2025-11-13", "gpt-5.1-2025-11-13", 128_000, OpenAi, OPENAI_LAB, reasoning: true),
    model!("o3-2025-04-16", "o3-2025-04-16", 200_000, OpenAi, OPENAI_LAB, reasoning: true),
    model!("gpt-4.1-2025-04-14", "gpt-4.1-2025-04-14", 128_000, OpenAi, OPENAI_LAB),
    model!("DeepSeek-V3.1", "deepseek-ai/DeepSeek-V3.1", 128_000, Together, DEEPSEEK_LAB),
    model!("Qwen3-235B-A22B-fp8-tput", "Qwen/Qwen3-235B-A22B-fp8-tput", 40_960, Together, QWEN_LAB),
    model!("Qwen3-235B-A22B-Thinking-2507", "Qwen/Qwen3-235B-A22B-Thinking-2507", 262_144, Together, QWEN_LAB),
    model!("Kimi-K2-Instruct", "moonshotai/Kimi-K2-Instruct", 128_000, Together, MOONSHOT_LAB),
    model!("Kimi-K2-Instruct-0905", "moonshotai/Kimi-K2-Instruct-0905", 262_144, Together, MOONSHOT_LAB),
    model!("Kimi-K2-Thinking", "moonshotai/Kimi-K2-Thinking", 262_144, Together, MOONSHOT_LAB),
    model!("GLM-4.5-Air-FP8", "zai-org/GLM-4.5-Air-FP8", 131_072, Together, ZAI_LAB),
    model!("GLM-4.6", "zai-org/GLM-4.6", 202_752, Together, ZAI_LAB),
    model!("claude-sonnet-4-5-20250929", "claude-sonnet-4-5-20250929", 200_000, Anthropic, ANTHROPIC_LAB),
    model!("claude-haiku-4-5-20251001", "claude-haiku-4-5-20251001", 200_000, Anthropic, ANTHROPIC_LAB),
    model!("claude-opus-4-1-20250805", "claude-opus-4-1-20250805", 200_000, Anthropic, ANTHROPIC_LAB),
    model!("claude-sonnet-4-20250514", "claude-sonnet-4-20250514", 200_000, Anthropic, ANTHROPIC_LAB),
    model!("claude-3-7-sonnet-20250219", "claude-3-7-sonnet-20250219", 200_000, Anthropic, ANTHROPIC_LAB),
    model!("grok-4-fast-reasoning", "grok-4-fast-reasoning", 2_000_000, Xai, XAI_LAB),
    model!("grok-4-fast-non-reasoning", "grok-4-fast-non-reasoning", 2_000_000, Xai, XAI_LAB),
    model!("grok-4-0709", "grok-4-0709", 256_000, Xai, XAI_LAB),
    model!("grok-4-1-fast-reasoning", "grok-4-1-fast-reasoning", 2_000_000, Xai, XAI_LAB, reasoning: true),
    model!("grok-4-1-fast-non-reasoning", "grok-4-1-fast-non-reasoning", 2_000_000, Xai, XAI_LAB),
    model!("gemini-2.5-pro", "gemini-2.5-pro", 1_048_576, Google, GOOGLE_LAB),
    model!("gemini-2.5-flash", "models/gemini-2.5-flash", 1_048_576, Google, GOOGLE_LAB),
    model!("gemini-3-pro-preview", "gemini-3-pro-preview", 1_048_576, Google, GOOGLE_LAB),
    model!("mistral-large-2411", "mistral-large-2411", 128_000, Mistral, MISTRAL_LAB),
    model!("magistral-medium-2506", "magistral-medium-2506", 40_000, Mistral, MISTRAL_LAB),
];

/// Iterate the full catalog.
pub fn models() -> &'static [Model] {
    MODELS
}

/// Look up a model by its unique short id.
pub fn find_model(id: &str) -> Option<&'static Model> {
    MODELS.iter().find(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn model_ids_are_unique() {
        let mut seen = HashSet::new();
        for model in models() {
            assert!(seen.insert(model.id), "duplicate model id {}", model.id);
        }
    }

    #[test]
    fn lookup_by_id() {
        let model = find_model("gemini-2.5-flash").unwrap();
        assert_eq!(model.full_name, "models/gemini-2.5-flash");
        assert_eq!(model.provider, ProviderKind::Google);
        assert!(find_model("no-such-model").is_none());
    }

    #[test]
    fn reasoning_flags_match_catalog() {
        assert!(find_model("o3-2025-04-16").unwrap().reasoning_model);
        assert!(find_model("gpt-5.1-2025-11-13").unwrap().reasoning_model);
        assert!(find_model("grok-4-1-fast-reasoning").unwrap().reasoning_model);
        assert!(!find_model("grok-4-1-fast-non-reasoning").unwrap().reasoning_model);
        assert!(!find_model("gpt-4.1-mini").unwrap().reasoning_model);
    }

    #[test]
    fn recent_additions_are_present() {
        for id in [
            "gpt-5.1-2025-11-13",
            "Kimi-K2-Thinking",
            "GLM-4.6",
            "grok-4-1-fast-reasoning",
            "grok-4-1-fast-non-reasoning",
            "gemini-3-pro-preview",
        ] {
            assert!(find_model(id).is_some(), "missing catalog entry {id}");
        }
        assert_eq!(find_model("GLM-4.6").unwrap().token_limit, 202_752);
        assert_eq!(find_model("Kimi-K2-Thinking").unwrap().full_name, "moonshotai/Kimi-K2-Thinking");
    }

    #[test]
    fn every_provider_variant_appears_in_catalog() {
        for kind in ProviderKind::ALL {
            assert!(
                models().iter().any(|m| m.provider == kind),
                "no catalog entry for {kind}"
            );
        }
    }
}
