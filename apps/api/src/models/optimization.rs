//! Stage 4 output: rewritten content ahead of assembling the final resume.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedBulletPoint {
    /// Original bullet point from the resume
    pub original: String,
    /// Enhanced version with better impact statements and relevant keywords
    pub optimized: String,
    /// Job-specific keywords naturally incorporated
    pub keywords_added: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedExperience {
    /// Company name from original resume
    pub company: String,
    /// Position title, possibly refined to align with target role terminology
    pub title: String,
    /// Employment duration
    pub duration: String,
    /// Enhanced bullet points for this experience
    pub optimized_achievements: Vec<OptimizedBulletPoint>,
    /// Display order within experience section (1 being highest)
    pub priority_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedProject {
    /// Project name, possibly refined for clarity
    pub name: String,
    /// Enhanced project description highlighting relevant aspects
    pub description: String,
    /// Technologies used, aligned with job requirements
    pub technologies: Vec<String>,
    /// Quantified or qualified impact of the project
    pub impact_statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedSkillCategory {
    /// Skill category (e.g., 'Technical', 'Tools', 'Soft Skills')
    pub category: String,
    /// List of skills in this category, ordered by relevance to job
    pub skills: Vec<String>,
    /// Category relevance score to job requirements (0-1)
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizedResume {
    /// Tailored professional summary highlighting key relevant qualifications
    pub summary: String,
    /// Optimized work experiences in priority order
    pub experiences: Vec<OptimizedExperience>,
    /// Reorganized skills categorized and prioritized for the role
    pub skills: Vec<OptimizedSkillCategory>,
    /// Optimized projects highlighting relevant technologies and impacts
    pub projects: Vec<OptimizedProject>,
    /// Score between 0-1 indicating natural keyword integration
    pub keyword_density_score: f64,
}

impl OptimizedResume {
    /// Every keyword the model reports having worked into a bullet, deduplicated
    /// case-insensitively in first-seen order.
    pub fn keywords_added(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.experiences
            .iter()
            .flat_map(|e| e.optimized_achievements.iter())
            .flat_map(|b| b.keywords_added.iter())
            .filter(|k| seen.insert(k.to_lowercase()))
            .map(String::as_str)
            .collect()
    }
}
