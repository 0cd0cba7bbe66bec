//! Resume Optimizer: runs the five-stage prompt chain for one resume/job pair.
//!
//! Flow: job analysis → gap analysis → content prioritization →
//!       content optimization → final resume.
//!
//! Every stage sends the whole conversation so far plus its own prompt, asks for a
//! schema-constrained answer, and appends the answer to the conversation. Later stages
//! therefore see every earlier analysis without it being re-sent in their prompt.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::llm_client::prompts::{SCHEMA_INSTRUCTION, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::{
    structured_chat_completion, ChatProvider, CompletionRequest, LlmError, StructuredOutput,
};
use crate::models::{ContentPrioritization, GapAnalysis, JobAnalysis, OptimizedResume, Resume};
use crate::optimization::{Conversation, Stage};
use crate::prompts::{PromptError, PromptLoader};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("{requested} called out of order; the next stage is {expected}")]
    StageOrder { requested: Stage, expected: Stage },

    #[error("{requested} called after the pipeline completed")]
    AlreadyCompleted { requested: Stage },

    #[error("Job description cannot be empty")]
    EmptyJobDescription,

    #[error("LLM call failed during {stage}: {source}")]
    Llm {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("Failed to serialize resume for the prompt: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Every intermediate result of one optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub run_id: Uuid,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub job_analysis: JobAnalysis,
    pub gap_analysis: GapAnalysis,
    pub content_prioritization: ContentPrioritization,
    pub optimized_content: OptimizedResume,
    pub final_resume: Resume,
}

/// One optimization run. Holds the conversation, so use a fresh optimizer per
/// resume/job pair.
pub struct ResumeOptimizer {
    provider: Arc<dyn ChatProvider>,
    prompts: Arc<PromptLoader>,
    model: String,
    temperature: f64,
    run_id: Uuid,
    conversation: Conversation,
    next_stage: Option<Stage>,
}

impl ResumeOptimizer {
    /// `prompts` must be the `optimization` group.
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        prompts: Arc<PromptLoader>,
        model: impl Into<String>,
    ) -> Result<Self, OptimizerError> {
        let system_prompt = prompts.render(
            "system",
            &[
                ("truthfulness_instruction", Some(TRUTHFULNESS_INSTRUCTION)),
                ("schema_instruction", Some(SCHEMA_INSTRUCTION)),
            ],
        )?;

        Ok(Self {
            provider,
            prompts,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            run_id: Uuid::new_v4(),
            conversation: Conversation::new(system_prompt),
            next_stage: Some(Stage::JobAnalysis),
        })
    }

    /// Stage 1: structured breakdown of the job description.
    pub async fn stage_1(
        &mut self,
        job_description: &str,
        user_preferences: Option<&str>,
    ) -> Result<JobAnalysis, OptimizerError> {
        self.check_order(Stage::JobAnalysis)?;
        if job_description.trim().is_empty() {
            return Err(OptimizerError::EmptyJobDescription);
        }
        let prompt = self.prompts.render(
            Stage::JobAnalysis.template(),
            &[
                ("job_description", Some(job_description)),
                ("user_preferences", user_preferences),
            ],
        )?;
        let analysis: JobAnalysis = self.run_stage(Stage::JobAnalysis, prompt).await?;
        info!(
            "Run {}: {} requirements, {} must-have",
            self.run_id,
            analysis.key_requirements.len(),
            analysis.must_have_requirements().count()
        );
        Ok(analysis)
    }

    /// Stage 2: gap analysis of `current_resume` against the stage 1 analysis.
    pub async fn stage_2(&mut self, current_resume: &Resume) -> Result<GapAnalysis, OptimizerError> {
        self.check_order(Stage::GapAnalysis)?;
        let resume_json = serde_json::to_string_pretty(current_resume)?;
        let prompt = self.prompts.render(
            Stage::GapAnalysis.template(),
            &[("current_resume_json", Some(resume_json.as_str()))],
        )?;
        let gaps: GapAnalysis = self.run_stage(Stage::GapAnalysis, prompt).await?;
        info!(
            "Run {}: match score {}/100, {} missing skills",
            self.run_id,
            gaps.overall_match_score,
            gaps.missing_skills().count()
        );
        Ok(gaps)
    }

    /// Stage 3: relevance scoring and section ordering.
    pub async fn stage_3(&mut self) -> Result<ContentPrioritization, OptimizerError> {
        self.check_order(Stage::ContentPrioritization)?;
        let prompt = self
            .prompts
            .render(Stage::ContentPrioritization.template(), &[])?;
        let priorities: ContentPrioritization =
            self.run_stage(Stage::ContentPrioritization, prompt).await?;
        info!(
            "Run {}: section order {:?}",
            self.run_id,
            priorities.section_order()
        );
        Ok(priorities)
    }

    /// Stage 4: rewritten content.
    pub async fn stage_4(&mut self) -> Result<OptimizedResume, OptimizerError> {
        self.check_order(Stage::ContentOptimization)?;
        let prompt = self
            .prompts
            .render(Stage::ContentOptimization.template(), &[])?;
        let optimized: OptimizedResume =
            self.run_stage(Stage::ContentOptimization, prompt).await?;
        info!(
            "Run {}: {} keywords added",
            self.run_id,
            optimized.keywords_added().len()
        );
        Ok(optimized)
    }

    /// Stage 5: the final resume, in the same shape as the input resume.
    pub async fn stage_5(&mut self) -> Result<Resume, OptimizerError> {
        self.check_order(Stage::FinalResume)?;
        let prompt = self.prompts.render(Stage::FinalResume.template(), &[])?;
        self.run_stage(Stage::FinalResume, prompt).await
    }

    /// Runs all five stages in order.
    pub async fn optimize_resume(
        &mut self,
        job_description: &str,
        current_resume: &Resume,
        user_preferences: Option<&str>,
    ) -> Result<OptimizationReport, OptimizerError> {
        let started_at = Utc::now();
        info!(
            "Optimization run {} started for {} (model: {})",
            self.run_id, current_resume.personal_info.name, self.model
        );

        let job_analysis = self.stage_1(job_description, user_preferences).await?;
        let gap_analysis = self.stage_2(current_resume).await?;
        let content_prioritization = self.stage_3().await?;
        let optimized_content = self.stage_4().await?;
        let final_resume = self.stage_5().await?;

        let finished_at = Utc::now();
        info!(
            "Optimization run {} finished in {}ms: match score {}/100",
            self.run_id,
            (finished_at - started_at).num_milliseconds(),
            gap_analysis.overall_match_score
        );

        Ok(OptimizationReport {
            run_id: self.run_id,
            model: self.model.clone(),
            started_at,
            finished_at,
            job_analysis,
            gap_analysis,
            content_prioritization,
            optimized_content,
            final_resume,
        })
    }

    fn check_order(&self, requested: Stage) -> Result<(), OptimizerError> {
        match self.next_stage {
            Some(expected) if expected == requested => Ok(()),
            Some(expected) => Err(OptimizerError::StageOrder {
                requested,
                expected,
            }),
            None => Err(OptimizerError::AlreadyCompleted { requested }),
        }
    }

    async fn run_stage<T: StructuredOutput + Serialize>(
        &mut self,
        stage: Stage,
        prompt: String,
    ) -> Result<T, OptimizerError> {
        info!("Run {}: starting {stage}", self.run_id);

        let request = CompletionRequest::new(&self.model, self.conversation.with_pending(&prompt))
            .temperature(self.temperature);
        let response = structured_chat_completion::<T>(self.provider.as_ref(), request)
            .await
            .map_err(|source| OptimizerError::Llm { stage, source })?;

        self.conversation.commit(prompt, response.content);
        self.next_stage = stage.next();

        info!(
            "Run {} {stage} output:\n{}",
            self.run_id,
            serde_json::to_string_pretty(&response.parsed).unwrap_or_default()
        );
        info!(
            "Run {}: completed {stage} ({} exchanges)",
            self.run_id,
            self.conversation.exchanges()
        );
        Ok(response.parsed)
    }
}

#[cfg(test)]
impl ResumeOptimizer {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The stage allowed to run next, or `None` once the final resume is produced.
    pub fn next_stage(&self) -> Option<Stage> {
        self.next_stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{MessageContent, Role};
    use crate::models::content::{ContentRelevance, SectionPriority};
    use crate::models::gaps::SkillGap;
    use crate::models::job::fixtures::sample_job_analysis;
    use crate::models::optimization::{OptimizedBulletPoint, OptimizedExperience};
    use crate::models::resume::fixtures::sample_resume;
    use crate::parsing::parser::testing::ScriptedProvider;
    use crate::prompts::OPTIMIZATION;

    fn gap_analysis() -> GapAnalysis {
        GapAnalysis {
            skill_gaps: vec![SkillGap {
                skill: "Kafka".to_string(),
                status: "Missing".to_string(),
                current_level: None,
                required_level: "Intermediate".to_string(),
                improvement_suggestion: Some("Mention event streaming work".to_string()),
            }],
            experience_matches: vec![],
            transferable_skills: vec![],
            terminology_alignments: vec![],
            critical_missing_elements: vec!["Kafka".to_string()],
            overall_match_score: 68,
            priority_improvements: vec!["Quantify ingestion throughput".to_string()],
        }
    }

    fn prioritization() -> ContentPrioritization {
        ContentPrioritization {
            content_relevance: vec![ContentRelevance {
                content_type: "Experience".to_string(),
                content_id: "experience[0]".to_string(),
                reasoning: "Directly relevant".to_string(),
                relevance_score: 9,
            }],
            achievement_enhancements: vec![],
            section_priorities: vec![SectionPriority {
                section_name: "Experience".to_string(),
                reasoning: "Strongest match".to_string(),
                suggested_order: 1,
            }],
            content_to_remove: vec![],
            focus_keywords: vec!["event streaming".to_string()],
        }
    }

    fn optimized() -> OptimizedResume {
        OptimizedResume {
            summary: "Backend engineer building event streaming pipelines.".to_string(),
            experiences: vec![OptimizedExperience {
                company: "Acme".to_string(),
                title: "Software Engineer".to_string(),
                duration: "Jan 2020 - Present".to_string(),
                optimized_achievements: vec![OptimizedBulletPoint {
                    original: "Built ingestion service processing 2M events/day".to_string(),
                    optimized: "Built event streaming ingestion service processing 2M events/day"
                        .to_string(),
                    keywords_added: vec!["event streaming".to_string()],
                }],
                priority_order: 1,
            }],
            skills: vec![],
            projects: vec![],
            keyword_density_score: 0.6,
        }
    }

    fn final_resume() -> Resume {
        let mut resume = sample_resume();
        resume.summary = "Backend engineer building event streaming pipelines.".to_string();
        resume
    }

    fn full_script() -> Vec<Result<String, LlmError>> {
        vec![
            Ok(serde_json::to_string(&sample_job_analysis()).unwrap()),
            Ok(serde_json::to_string(&gap_analysis()).unwrap()),
            Ok(serde_json::to_string(&prioritization()).unwrap()),
            Ok(serde_json::to_string(&optimized()).unwrap()),
            Ok(serde_json::to_string(&final_resume()).unwrap()),
        ]
    }

    fn optimizer(provider: Arc<ScriptedProvider>) -> ResumeOptimizer {
        ResumeOptimizer::new(
            provider,
            Arc::new(PromptLoader::new(OPTIMIZATION).unwrap()),
            DEFAULT_MODEL,
        )
        .unwrap()
    }

    /// Collects formatted log lines for assertions.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_stage_output_is_logged_at_info() {
        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider);
        optimizer
            .stage_1("Senior Rust Engineer at Example", None)
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("job analysis output"), "got {output}");
        assert!(output.contains("\"role_title\""), "got {output}");
        assert!(output.contains(" INFO "), "got {output}");
    }

    #[tokio::test]
    async fn test_optimize_resume_runs_all_stages_over_growing_history() {
        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider.clone());

        let report = optimizer
            .optimize_resume("Senior Rust Engineer at Example", &sample_resume(), None)
            .await
            .unwrap();

        assert_eq!(report.job_analysis, sample_job_analysis());
        assert_eq!(report.gap_analysis.overall_match_score, 68);
        assert_eq!(report.final_resume, final_resume());
        assert_eq!(report.model, "gpt-4o");
        assert!(report.finished_at >= report.started_at);
        assert_eq!(report.run_id, optimizer.run_id());

        assert_eq!(provider.request_count(), 5);
        for (i, stage) in Stage::ALL.iter().enumerate() {
            let request = provider.request(i);
            // system + i completed exchanges + the pending user turn
            assert_eq!(request.messages.len(), 2 + 2 * i, "{stage}");
            assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
            assert_eq!(request.messages.last().unwrap().role, Role::User);
        }

        let schema_names: Vec<String> = (0..5)
            .map(|i| provider.request(i).response_format.unwrap().name().to_string())
            .collect();
        assert_eq!(
            schema_names,
            vec![
                "JobAnalysis",
                "GapAnalysis",
                "ContentPrioritization",
                "OptimizedResume",
                "Resume"
            ]
        );

        assert_eq!(optimizer.conversation().exchanges(), 5);
        assert_eq!(optimizer.next_stage(), None);
    }

    #[tokio::test]
    async fn test_assistant_turns_carry_raw_model_content() {
        let script = full_script();
        let first_answer = script[0].as_ref().unwrap().clone();
        let provider = Arc::new(ScriptedProvider::new(script));
        let mut optimizer = optimizer(provider.clone());

        optimizer.stage_1("Rust role", None).await.unwrap();
        optimizer.stage_2(&sample_resume()).await.unwrap();

        let second = provider.request(1);
        assert_eq!(second.messages[2].role, Role::Assistant);
        assert_eq!(
            second.messages[2].content,
            MessageContent::Text(first_answer)
        );
    }

    #[tokio::test]
    async fn test_stage_prompts_carry_inputs() {
        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider.clone());

        optimizer
            .stage_1("Distributed systems role", Some("Prefer remote teams"))
            .await
            .unwrap();
        optimizer.stage_2(&sample_resume()).await.unwrap();

        let stage_1_prompt = provider.request(0).messages[1].text().unwrap().to_string();
        assert!(stage_1_prompt.contains("Distributed systems role"));
        assert!(stage_1_prompt.contains("Prefer remote teams"));

        let stage_2_prompt = provider.request(1).messages[3].text().unwrap().to_string();
        let pretty = serde_json::to_string_pretty(&sample_resume()).unwrap();
        assert!(stage_2_prompt.contains(&pretty));

        let system = provider.request(0).messages[0].text().unwrap().to_string();
        assert!(system.contains(TRUTHFULNESS_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_out_of_order_stage_is_rejected_without_a_call() {
        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider.clone());

        let err = optimizer.stage_3().await.unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::StageOrder {
                requested: Stage::ContentPrioritization,
                expected: Stage::JobAnalysis
            }
        ));
        assert_eq!(provider.request_count(), 0);
        assert_eq!(optimizer.conversation().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_repeating_a_completed_stage_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider.clone());

        optimizer.stage_1("Rust role", None).await.unwrap();
        let err = optimizer.stage_1("Rust role", None).await.unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::StageOrder {
                requested: Stage::JobAnalysis,
                expected: Stage::GapAnalysis
            }
        ));
    }

    #[tokio::test]
    async fn test_stage_after_completion_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider);
        optimizer
            .optimize_resume("Rust role", &sample_resume(), None)
            .await
            .unwrap();

        let err = optimizer.stage_5().await.unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::AlreadyCompleted {
                requested: Stage::FinalResume
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_stage_leaves_history_untouched_and_can_be_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(serde_json::to_string(&sample_job_analysis()).unwrap()),
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
            Ok(serde_json::to_string(&gap_analysis()).unwrap()),
        ]));
        let mut optimizer = optimizer(provider.clone());

        optimizer.stage_1("Rust role", None).await.unwrap();
        let err = optimizer.stage_2(&sample_resume()).await.unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Llm {
                stage: Stage::GapAnalysis,
                ..
            }
        ));
        assert_eq!(optimizer.conversation().messages().len(), 3);
        assert_eq!(optimizer.next_stage(), Some(Stage::GapAnalysis));

        let gaps = optimizer.stage_2(&sample_resume()).await.unwrap();
        assert_eq!(gaps, gap_analysis());
        assert_eq!(optimizer.conversation().messages().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new(full_script()));
        let mut optimizer = optimizer(provider.clone());

        let err = optimizer
            .optimize_resume("   ", &sample_resume(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizerError::EmptyJobDescription));
        assert_eq!(provider.request_count(), 0);
    }

    #[tokio::test]
    async fn test_schema_mismatch_stops_the_pipeline() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(serde_json::to_string(&sample_job_analysis()).unwrap()),
            Ok("{\"skill_gaps\": \"none\"}".to_string()),
        ]));
        let mut optimizer = optimizer(provider.clone());

        let err = optimizer
            .optimize_resume("Rust role", &sample_resume(), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Llm {
                stage: Stage::GapAnalysis,
                source: LlmError::Parse(_)
            }
        ));
        assert_eq!(provider.request_count(), 2);
    }
}
