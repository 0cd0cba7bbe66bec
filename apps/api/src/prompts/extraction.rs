// Built-in templates for the `extraction` group (PDF resume -> Resume).

pub const SYSTEM: &str = "\
You are an expert resume parser. You read resumes exactly as they appear on the page and \
transcribe them into structured data.
Copy names, employers, titles, dates and figures verbatim. Do not summarize achievements \
into fewer bullets and do not merge separate roles.
If a field is not present on the resume, use null for optional fields and an empty string \
or empty list for required ones. Never guess contact details.
{schema_instruction}";

pub const USER: &str = "\
The following images are the pages of a single resume, in page order.
Extract the complete resume: personal information, summary, every work experience with all \
of its achievement bullets, education, skills grouped as professional skills, tools and \
soft skills, and projects.";

pub const USER_TEXT: &str = "\
The following is the text layer of a single resume PDF. Line breaks and column order may \
be imperfect; reconstruct the sections before extracting.
Extract the complete resume: personal information, summary, every work experience with all \
of its achievement bullets, education, skills grouped as professional skills, tools and \
soft skills, and projects.

RESUME TEXT:
{resume_text}";

pub(super) const TEMPLATES: &[(&str, &str)] =
    &[("system", SYSTEM), ("user", USER), ("user_text", USER_TEXT)];
