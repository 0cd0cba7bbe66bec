// Cross-cutting prompt fragments shared by the extraction and optimization groups.
// Stage-specific wording lives in crate::prompts.

/// Appended to every system prompt that rewrites candidate content.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
CRITICAL: Never invent employers, titles, dates, degrees, metrics or technologies. \
Every statement must be traceable to the candidate's resume. \
Rephrase and reorder freely, but do not fabricate.";

/// Appended to every system prompt whose answer is consumed as structured output.
pub const SCHEMA_INSTRUCTION: &str = "\
Answer only with data that fits the requested response schema. \
Use empty lists rather than placeholder text when nothing applies.";
