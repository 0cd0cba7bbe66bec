//! Stage 3 output: which parts of the resume matter for this role, and in what order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentRelevance {
    /// Type of content being evaluated (e.g., 'Experience', 'Project', 'Skill')
    pub content_type: String,
    /// Identifier from original resume to track this content piece
    pub content_id: String,
    /// Explanation of why this content is relevant or not
    pub reasoning: String,
    /// Relevance score from 1-10, where 10 is most relevant to the job
    pub relevance_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AchievementEnhancement {
    /// Original achievement text from resume
    pub original: String,
    /// How this achievement relates to target role
    pub relevance_context: String,
    /// Suggested optimization while maintaining truthfulness
    pub suggested_rewrite: String,
    /// Display priority from 1-5, where 1 is highest priority
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionPriority {
    /// Name of resume section (e.g., 'Experience', 'Skills', 'Projects')
    pub section_name: String,
    /// Explanation for this prioritization
    pub reasoning: String,
    /// Suggested order in final resume (1 being top)
    pub suggested_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentPrioritization {
    /// Relevance analysis of each major content piece
    pub content_relevance: Vec<ContentRelevance>,
    /// Suggested improvements for achievements
    pub achievement_enhancements: Vec<AchievementEnhancement>,
    /// Recommended organization of resume sections
    pub section_priorities: Vec<SectionPriority>,
    /// Content pieces that could be removed to focus on more relevant items
    pub content_to_remove: Vec<String>,
    /// Key terms/phrases that should be emphasized throughout
    pub focus_keywords: Vec<String>,
}

impl ContentPrioritization {
    /// Section names sorted by `suggested_order`, ties kept in model order.
    pub fn section_order(&self) -> Vec<&str> {
        let mut sections: Vec<&SectionPriority> = self.section_priorities.iter().collect();
        sections.sort_by_key(|s| s.suggested_order);
        sections.into_iter().map(|s| s.section_name.as_str()).collect()
    }
}
