//! Prompt loader: resolves the named templates for each pipeline.
//!
//! Templates are compiled into the binary. A deployment can replace any of them by
//! placing `<group>/<name>.txt` under `PROMPTS_DIR`; overrides are read once, when the
//! loader is built.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

pub mod extraction;
pub mod optimization;

pub const EXTRACTION: &str = "extraction";
pub const OPTIMIZATION: &str = "optimization";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt group '{0}' does not exist")]
    UnknownGroup(String),

    #[error("No template '{name}' found in '{group}' prompt group")]
    UnknownTemplate { group: String, name: String },

    #[error("Failed to read prompt override {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn builtin_templates(group: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match group {
        EXTRACTION => Some(extraction::TEMPLATES),
        OPTIMIZATION => Some(optimization::TEMPLATES),
        _ => None,
    }
}

/// All templates of one group, resolved against optional on-disk overrides.
#[derive(Debug, Clone)]
pub struct PromptLoader {
    group: String,
    templates: HashMap<String, Template>,
}

impl PromptLoader {
    /// Loads the built-in templates of `group`.
    #[cfg(test)]
    pub fn new(group: &str) -> Result<Self, PromptError> {
        Self::with_overrides(group, None)
    }

    /// Loads `group`, preferring `<override_dir>/<group>/<name>.txt` where it exists.
    pub fn with_overrides(group: &str, override_dir: Option<&Path>) -> Result<Self, PromptError> {
        let builtins =
            builtin_templates(group).ok_or_else(|| PromptError::UnknownGroup(group.to_string()))?;

        let group_dir = override_dir.map(|dir| dir.join(group));
        let mut templates = HashMap::with_capacity(builtins.len());

        for (name, source) in builtins {
            let override_path = group_dir
                .as_ref()
                .map(|dir| dir.join(format!("{name}.txt")))
                .filter(|path| path.is_file());

            let source = match override_path {
                Some(path) => {
                    let text = std::fs::read_to_string(&path).map_err(|source| PromptError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                    info!("Using prompt override {}", path.display());
                    text
                }
                None => source.to_string(),
            };

            templates.insert(
                name.to_string(),
                Template {
                    name: format!("{group}/{name}"),
                    source,
                },
            );
        }

        debug!("Loaded {} templates for prompt group '{group}'", templates.len());

        Ok(Self {
            group: group.to_string(),
            templates,
        })
    }

    pub fn template(&self, name: &str) -> Result<&Template, PromptError> {
        self.templates
            .get(name)
            .ok_or_else(|| PromptError::UnknownTemplate {
                group: self.group.clone(),
                name: name.to_string(),
            })
    }

    /// Shorthand for `template(name)?.render(vars)`.
    pub fn render(&self, name: &str, vars: &[(&str, Option<&str>)]) -> Result<String, PromptError> {
        let template = self.template(name)?;
        debug!("Rendering prompt {}", template.name());
        Ok(template.render(vars))
    }
}

/// A prompt template.
///
/// Syntax:
/// - `{var}` is replaced by the value of `var`. Placeholders with no matching variable are
///   left untouched, so literal braces in prompts survive.
/// - A block of lines opened by a line `{?var}` and closed by a line `{/var}` is kept only
///   when `var` is set to a non-blank value. Blocks do not nest.
///
/// Substitution is a single pass: text inserted for a variable is never re-scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, vars: &[(&str, Option<&str>)]) -> String {
        let values: HashMap<&str, &str> = vars
            .iter()
            .map(|(key, value)| (*key, value.unwrap_or("")))
            .collect();

        let kept = strip_optional_blocks(&self.source, &values);
        substitute(&kept, &values)
    }
}

fn strip_optional_blocks(source: &str, values: &HashMap<&str, &str>) -> String {
    let mut lines = Vec::new();
    let mut open_block: Option<(&str, bool)> = None;

    for line in source.split('\n') {
        let marker = line.trim();
        if let Some(var) = marker.strip_prefix("{?").and_then(|m| m.strip_suffix('}')) {
            let keep = values.get(var).is_some_and(|v| !v.trim().is_empty());
            open_block = Some((var, keep));
            continue;
        }
        if let Some((var, _)) = open_block {
            if marker == format!("{{/{var}}}") {
                open_block = None;
                continue;
            }
        }
        match open_block {
            Some((_, false)) => {}
            _ => lines.push(line),
        }
    }

    lines.join("\n")
}

fn substitute(text: &str, values: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}').and_then(|end| values.get(&after[..end]).map(|v| (end, v))) {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(source: &str) -> Template {
        Template {
            name: "test/t".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_unknown_group_is_rejected() {
        let err = PromptLoader::new("translation").unwrap_err();
        assert!(matches!(err, PromptError::UnknownGroup(ref g) if g == "translation"));
    }

    #[test]
    fn test_unknown_template_names_group_and_template() {
        let loader = PromptLoader::new(EXTRACTION).unwrap();
        let err = loader.template("stage_9").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No template 'stage_9' found in 'extraction' prompt group"
        );
    }

    #[test]
    fn test_optimization_group_has_all_stages() {
        let loader = PromptLoader::new(OPTIMIZATION).unwrap();
        for name in ["system", "stage_1", "stage_2", "stage_3", "stage_4", "stage_5"] {
            assert!(loader.template(name).is_ok(), "missing {name}");
        }
        assert_eq!(loader.template("stage_2").unwrap().name(), "optimization/stage_2");
    }

    #[test]
    fn test_substitutes_known_placeholders_only() {
        let t = template("Hello {name}, keep {this} and {}");
        assert_eq!(
            t.render(&[("name", Some("Ada"))]),
            "Hello Ada, keep {this} and {}"
        );
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let t = template("A: {a}\nB: {b}");
        let rendered = t.render(&[("a", Some("{b}")), ("b", Some("two"))]);
        assert_eq!(rendered, "A: {b}\nB: two");
    }

    #[test]
    fn test_json_values_are_inserted_verbatim() {
        let t = template("RESUME:\n{current_resume_json}");
        let json = "{\n  \"summary\": \"x\"\n}";
        assert_eq!(
            t.render(&[("current_resume_json", Some(json))]),
            format!("RESUME:\n{json}")
        );
    }

    #[test]
    fn test_optional_block_kept_when_set() {
        let t = template("JD:\n{jd}\n{?prefs}\nPREFS:\n{prefs}\n{/prefs}\nEND");
        let rendered = t.render(&[("jd", Some("Rust")), ("prefs", Some("remote only"))]);
        assert_eq!(rendered, "JD:\nRust\nPREFS:\nremote only\nEND");
    }

    #[test]
    fn test_optional_block_dropped_when_missing_or_blank() {
        let t = template("JD:\n{jd}\n{?prefs}\nPREFS:\n{prefs}\n{/prefs}\nEND");
        assert_eq!(t.render(&[("jd", Some("Rust")), ("prefs", None)]), "JD:\nRust\nEND");
        assert_eq!(
            t.render(&[("jd", Some("Rust")), ("prefs", Some("  "))]),
            "JD:\nRust\nEND"
        );
        assert_eq!(t.render(&[("jd", Some("Rust"))]), "JD:\nRust\nEND");
    }

    #[test]
    fn test_builtin_stage_1_renders_preferences_block() {
        let loader = PromptLoader::new(OPTIMIZATION).unwrap();
        let with = loader
            .render(
                "stage_1",
                &[
                    ("job_description", Some("Rust engineer")),
                    ("user_preferences", Some("Emphasize open source")),
                ],
            )
            .unwrap();
        assert!(with.contains("Rust engineer"));
        assert!(with.contains("CANDIDATE PREFERENCES"));
        assert!(with.contains("Emphasize open source"));
        assert!(!with.contains("{?user_preferences}"));

        let without = loader
            .render(
                "stage_1",
                &[("job_description", Some("Rust engineer")), ("user_preferences", None)],
            )
            .unwrap();
        assert!(!without.contains("CANDIDATE PREFERENCES"));
        assert!(!without.contains("{/user_preferences}"));
    }

    #[test]
    fn test_override_directory_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let group_dir = dir.path().join(OPTIMIZATION);
        std::fs::create_dir_all(&group_dir).unwrap();
        std::fs::write(group_dir.join("stage_3.txt"), "Custom step three").unwrap();

        let loader = PromptLoader::with_overrides(OPTIMIZATION, Some(dir.path())).unwrap();
        assert_eq!(loader.render("stage_3", &[]).unwrap(), "Custom step three");
        assert_eq!(
            loader.render("stage_4", &[]).unwrap(),
            optimization::STAGE_4,
            "templates without an override fall back to the built-in text"
        );
    }

    #[test]
    fn test_missing_override_group_dir_uses_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let loader = PromptLoader::with_overrides(EXTRACTION, Some(dir.path())).unwrap();
        assert_eq!(loader.render("user", &[]).unwrap(), extraction::USER);
    }
}
