//! Prompt templates for pdfchat.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub qa: QaPrompts,
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompt for answering questions from retrieved context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    pub template: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            template: r#"Je bent een nauwkeurige assistent die alleen antwoord geeft op basis van de gegeven context.

Belangrijke regels:
1. Gebruik ALLEEN informatie die expliciet in de context staat
2. Als je het antwoord niet kunt vinden in de context, zeg dat dan eerlijk
3. Verzin NOOIT informatie die niet in de context staat
4. Wees direct en to-the-point in je antwoorden
5. Als er tabellen of lijsten in de context staan, geef deze correct weer
6. Antwoord altijd in het Nederlands
7. Als er meerdere relevante stukken informatie zijn, combineer deze in je antwoord
8. Geef aan als je informatie uit verschillende delen van het document combineert
9. Als je een deel van de tekst letterlijk citeert, gebruik dan aanhalingstekens

Context: {{context}}

Vraag: {{question}}

Antwoord: Let op bovenstaande regels en geef een nauwkeurig antwoord."#.to_string(),
        }
    }
}

/// Prompt for the whole-document tender summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub template: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            template: r#"Samenvatting van het volgende aanbestedingsdocument voor de Nederlandse mobiliteitsmarkt: {{document}}.

- Altijd in het Nederlands antwoorden
- Creëer een duidelijke structuur
- Focus op vereisten die nodig zijn om de aanbesteding te winnen
- Focus op deadlines die gehaald moeten worden
- Focus op specifieke belangrijke punten die de aanbesteding zullen winnen"#.to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is single-pass: placeholders that appear inside a
    /// substituted value (for example in document text) are left alone.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
