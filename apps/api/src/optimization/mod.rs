// Resume optimization: five structured stages over one accumulating conversation.
// All LLM calls go through llm_client. No direct OpenAI calls here.

pub mod conversation;
pub mod handlers;
pub mod optimizer;

use std::fmt;

use serde::Serialize;

pub use conversation::Conversation;
pub use optimizer::{OptimizationReport, ResumeOptimizer};

/// The optimization stages, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    JobAnalysis,
    GapAnalysis,
    ContentPrioritization,
    ContentOptimization,
    FinalResume,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::JobAnalysis,
        Stage::GapAnalysis,
        Stage::ContentPrioritization,
        Stage::ContentOptimization,
        Stage::FinalResume,
    ];

    /// 1-based position in the pipeline.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    /// Name of the `optimization` prompt template driving this stage.
    pub fn template(self) -> &'static str {
        match self {
            Stage::JobAnalysis => "stage_1",
            Stage::GapAnalysis => "stage_2",
            Stage::ContentPrioritization => "stage_3",
            Stage::ContentOptimization => "stage_4",
            Stage::FinalResume => "stage_5",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::JobAnalysis => "job analysis",
            Stage::GapAnalysis => "gap analysis",
            Stage::ContentPrioritization => "content prioritization",
            Stage::ContentOptimization => "content optimization",
            Stage::FinalResume => "final resume",
        }
    }

    pub fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.number()).copied()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} ({})", self.number(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_numbers_and_templates_line_up() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.number(), i + 1);
            assert_eq!(stage.template(), format!("stage_{}", i + 1));
        }
    }

    #[test]
    fn test_next_walks_the_pipeline_and_ends() {
        assert_eq!(Stage::JobAnalysis.next(), Some(Stage::GapAnalysis));
        assert_eq!(Stage::ContentOptimization.next(), Some(Stage::FinalResume));
        assert_eq!(Stage::FinalResume.next(), None);
    }

    #[test]
    fn test_display_names_number_and_label() {
        assert_eq!(Stage::GapAnalysis.to_string(), "stage 2 (gap analysis)");
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::ContentPrioritization).unwrap();
        assert_eq!(json, "\"content_prioritization\"");
    }
}
