// Typed containers for every structured completion in the pipeline.
// Doc comments on fields become `description` entries in the generated JSON schema,
// so they are written for the model as much as for the reader.

pub mod content;
pub mod gaps;
pub mod job;
pub mod optimization;
pub mod resume;

pub use content::ContentPrioritization;
pub use gaps::GapAnalysis;
pub use job::JobAnalysis;
pub use optimization::OptimizedResume;
pub use resume::Resume;
