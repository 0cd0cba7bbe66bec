use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Basic contact and identifying information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonalInfo {
    /// Full name of the individual
    pub name: String,
    /// Professional email address
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Current city/location
    pub location: String,
    /// LinkedIn profile URL
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Experience {
    /// Name of the organization/employer
    pub company: String,
    /// Job title/position held
    pub title: String,
    /// Time period of employment (e.g., 'Jan 2020 - Present')
    pub duration: String,
    /// Location of the workplace
    pub location: String,
    /// Key accomplishments and responsibilities in the role
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Education {
    /// Name of degree/certification obtained
    pub degree: String,
    /// Name of educational institution
    pub institution: String,
    /// Time period of study (e.g., '2016 - 2020')
    pub duration: String,
    /// Grade Point Average or academic performance metric
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Skills {
    /// Core professional and domain-specific skills
    pub professional: Vec<String>,
    /// Software, equipment, or tools proficiency
    pub tools: Vec<String>,
    /// Interpersonal and transferable skills
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    /// Title of the project
    pub name: String,
    /// Brief overview of the project and its impact
    pub description: String,
    /// Key methods, technologies, approaches, or tools used
    pub methodologies: Vec<String>,
    /// URL to project documentation or outcome.
    #[serde(default)]
    pub link: Option<String>,
}

/// A complete resume as extracted from a PDF, and the shape of the final optimized resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Resume {
    /// Basic contact and identifying information
    pub personal_info: PersonalInfo,
    /// Brief professional summary or objective statement
    pub summary: String,
    /// Professional work history
    pub experience: Vec<Experience>,
    /// Academic background and qualifications
    pub education: Vec<Education>,
    /// Professional capabilities and competencies
    pub skills: Skills,
    /// Notable projects and achievements
    pub projects: Vec<Project>,
}

impl Resume {
    /// Total number of achievement bullets across all experience entries.
    pub fn achievement_count(&self) -> usize {
        self.experience.iter().map(|e| e.achievements.len()).sum()
    }
}
