// Built-in templates for the `optimization` group. Stage prompts are sent in order over a
// single conversation, so later stages refer back to earlier answers instead of repeating them.

pub const SYSTEM: &str = "\
You are a senior technical recruiter and resume strategist. You help candidates tailor an \
existing resume to a specific job description through a sequence of analysis steps. Each \
step builds on your previous answers in this conversation.
{truthfulness_instruction}
{schema_instruction}";

pub const STAGE_1: &str = "\
STEP 1: JOB ANALYSIS
Analyze the job description below. Identify the role title, the key requirements and \
whether each is a Must-have or Nice-to-have, the expected experience level, primary skills, \
core responsibilities, industry keywords, company attributes, preferred qualifications and \
required domain knowledge.

JOB DESCRIPTION:
{job_description}
{?user_preferences}

CANDIDATE PREFERENCES (take these into account in every later step):
{user_preferences}
{/user_preferences}";

pub const STAGE_2: &str = "\
STEP 2: GAP ANALYSIS
Compare the candidate's current resume against your job analysis. For each primary skill \
report whether it is Present, Partial or Missing. Match experiences to requirements and rate \
each match Strong, Moderate or Weak. Identify transferable skills, terminology in the resume \
that should use the job description's wording, critical missing elements, an overall match \
score from 0 to 100, and a prioritized list of improvements.

CURRENT RESUME (JSON):
{current_resume_json}";

pub const STAGE_3: &str = "\
STEP 3: CONTENT PRIORITIZATION
Using your job analysis and gap analysis, decide what the optimized resume should emphasize. \
Score every experience, project and skill group for relevance from 1 to 10; identify each \
piece with a stable id such as experience[0] or projects[2]. Propose truthful rewrites for \
the most relevant achievements with a display priority from 1 (highest) to 5, a section \
order, content that can be dropped, and the keywords to emphasize throughout.";

pub const STAGE_4: &str = "\
STEP 4: CONTENT OPTIMIZATION
Rewrite the resume content according to your prioritization. Produce a tailored summary, \
optimized achievements for each experience (keeping the original text alongside each rewrite \
and listing the job keywords you worked in), skills regrouped into categories ordered by \
relevance, and optimized projects with an impact statement. Score keyword integration from \
0 to 1; keywords must read naturally, never stuffed.";

pub const STAGE_5: &str = "\
STEP 5: FINAL RESUME
Assemble the final optimized resume in the same structure as the original resume. Copy the \
personal information exactly as it appears in the original. Use your optimized summary, \
experiences in priority order with the optimized achievement text, education unchanged, \
skills regrouped into professional skills, tools and soft skills, and the optimized projects. \
Leave out only the content you marked for removal.";

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    ("system", SYSTEM),
    ("stage_1", STAGE_1),
    ("stage_2", STAGE_2),
    ("stage_3", STAGE_3),
    ("stage_4", STAGE_4),
    ("stage_5", STAGE_5),
];
