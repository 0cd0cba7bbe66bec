//! Stage 2 output: how the current resume measures up against the analyzed job.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coverage of a single skill, as reported in `SkillGap::status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillStatus {
    Present,
    Partial,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkillGap {
    /// Name of the skill being evaluated
    pub skill: String,
    /// Current status of the skill - 'Present', 'Partial', or 'Missing'
    pub status: String,
    /// Current proficiency level of the skill if present
    #[serde(default)]
    pub current_level: Option<String>,
    /// Required proficiency level for the job
    pub required_level: String,
    /// Specific suggestions for improving this skill gap
    #[serde(default)]
    pub improvement_suggestion: Option<String>,
}

impl SkillGap {
    /// Parses the free-text status. Unrecognized values yield `None`.
    pub fn status(&self) -> Option<SkillStatus> {
        match self.status.trim().to_ascii_lowercase().as_str() {
            "present" => Some(SkillStatus::Present),
            "partial" => Some(SkillStatus::Partial),
            "missing" => Some(SkillStatus::Missing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchingExperience {
    /// Experience being evaluated
    pub experience: String,
    /// Explanation of how the experience matches the job requirement
    pub relevance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExperienceMatch {
    /// Specific job requirement being evaluated
    pub job_requirement: String,
    /// List of matching experiences
    pub matching_experiences: Vec<MatchingExperience>,
    /// Overall strength of the match - 'Strong', 'Moderate', or 'Weak'
    pub strength_level: String,
    /// Notes on how to better present or optimize these experiences
    pub optimization_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransferableSkill {
    /// Existing skill that could be transferred
    pub current_skill: String,
    /// Target skill or requirement this could apply to
    pub transferable_to: String,
    /// Explanation of how the current skill transfers to the target
    pub relevance_explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TerminologyAlignment {
    /// Current term from resume
    pub original_term: String,
    /// Preferred term from job description
    pub preferred_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GapAnalysis {
    /// List of identified skill gaps and their analysis
    pub skill_gaps: Vec<SkillGap>,
    /// Analysis of how experiences match job requirements
    pub experience_matches: Vec<ExperienceMatch>,
    /// Skills that could be reframed as relevant
    pub transferable_skills: Vec<TransferableSkill>,
    /// Mapping of current terms to preferred job description terms
    pub terminology_alignments: Vec<TerminologyAlignment>,
    /// Key requirements with no current match
    pub critical_missing_elements: Vec<String>,
    /// Overall match score from 0-100
    pub overall_match_score: i32,
    /// Prioritized list of suggested improvements
    pub priority_improvements: Vec<String>,
}

impl GapAnalysis {
    pub fn missing_skills(&self) -> impl Iterator<Item = &SkillGap> {
        self.skill_gaps
            .iter()
            .filter(|g| g.status() == Some(SkillStatus::Missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(skill: &str, status: &str) -> SkillGap {
        SkillGap {
            skill: skill.to_string(),
            status: status.to_string(),
            current_level: None,
            required_level: "Advanced".to_string(),
            improvement_suggestion: None,
        }
    }

    #[test]
    fn test_skill_status_is_case_insensitive() {
        assert_eq!(gap("Rust", "present").status(), Some(SkillStatus::Present));
        assert_eq!(gap("Rust", " Partial ").status(), Some(SkillStatus::Partial));
        assert_eq!(gap("Rust", "MISSING").status(), Some(SkillStatus::Missing));
        assert_eq!(gap("Rust", "unknown").status(), None);
    }

    #[test]
    fn test_missing_skills_filters_on_status() {
        let analysis = GapAnalysis {
            skill_gaps: vec![gap("Rust", "Present"), gap("Kafka", "Missing")],
            experience_matches: vec![],
            transferable_skills: vec![],
            terminology_alignments: vec![],
            critical_missing_elements: vec!["Kafka".to_string()],
            overall_match_score: 72,
            priority_improvements: vec![],
        };
        let missing: Vec<_> = analysis.missing_skills().map(|g| g.skill.as_str()).collect();
        assert_eq!(missing, vec!["Kafka"]);
    }

    #[test]
    fn test_null_optional_fields_deserialize() {
        let json = r#"{
            "skill": "Go", "status": "Missing", "current_level": null,
            "required_level": "Intermediate", "improvement_suggestion": null
        }"#;
        let g: SkillGap = serde_json::from_str(json).unwrap();
        assert!(g.current_level.is_none());
        assert!(g.improvement_suggestion.is_none());
    }

    #[test]
    fn test_negative_match_score_deserializes() {
        let json = r#"{
            "skill_gaps": [], "experience_matches": [], "transferable_skills": [],
            "terminology_alignments": [], "critical_missing_elements": [],
            "overall_match_score": -5, "priority_improvements": []
        }"#;
        let analysis: GapAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.overall_match_score, -5);
    }
}
