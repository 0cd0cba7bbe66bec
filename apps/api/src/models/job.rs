//! Stage 1 output: structured breakdown of a job description.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobRequirement {
    /// Category of the requirement (e.g., 'Technical', 'Soft Skills', 'Experience')
    pub category: String,
    /// Importance level of the requirement ('Must-have' or 'Nice-to-have')
    pub importance: String,
    /// Detailed description of the job requirement
    pub description: String,
}

impl JobRequirement {
    /// True when the model tagged this requirement as a must-have.
    pub fn is_must_have(&self) -> bool {
        let normalized: String = self
            .importance
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        normalized == "musthave" || normalized == "required"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyAttribute {
    /// Type of company attribute (e.g., 'Culture', 'Values', 'Work Environment')
    pub attribute: String,
    /// Detailed description of the company attribute
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobAnalysis {
    /// Title of the job role being analyzed
    pub role_title: String,
    /// List of key job requirements
    pub key_requirements: Vec<JobRequirement>,
    /// Required experience level for the role
    pub experience_level: String,
    /// List of primary skills needed for the job
    pub primary_skills: Vec<String>,
    /// List of core responsibilities associated with the role
    pub core_responsibilities: Vec<String>,
    /// List of industry-specific keywords relevant to the job
    pub industry_keywords: Vec<String>,
    /// List of attributes that define the company
    pub company_attributes: Vec<CompanyAttribute>,
    /// List of qualifications that are preferred but not mandatory
    pub preferred_qualifications: Vec<String>,
    /// Specific knowledge required in the domain of the job
    pub domain_knowledge: Vec<String>,
}

impl JobAnalysis {
    pub fn must_have_requirements(&self) -> impl Iterator<Item = &JobRequirement> {
        self.key_requirements.iter().filter(|r| r.is_must_have())
    }
}
