//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::classifier::LabelScore;
use crate::cli::args::{OutputFormat, SieveArgs};
use crate::error::Result;

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub documents_trained: usize,
    pub lines_skipped: usize,
    pub labels: usize,
    pub vocabulary_size: usize,
    pub duration_ms: u64,
}

/// Result structure for classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub model_path: String,
    pub scores: Vec<LabelScore>,
}

/// Per-label statistics of a model.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelStats {
    pub label: String,
    pub documents: u64,
    pub tokens: u64,
    pub distinct_tokens: usize,
}

/// Model statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelStats {
    pub model_path: String,
    pub total_documents: u64,
    pub vocabulary_size: usize,
    pub labels: Vec<LabelStats>,
}

/// Results that can be printed for people as well as serialized.
pub trait HumanReadable: Serialize {
    /// Render the result as lines of text.
    fn to_human(&self) -> Vec<String>;
}

impl HumanReadable for TrainingResult {
    fn to_human(&self) -> Vec<String> {
        vec![
            format!("Model:      {}", self.model_path),
            format!("Documents:  {}", self.documents_trained),
            format!("Skipped:    {}", self.lines_skipped),
            format!("Labels:     {}", self.labels),
            format!("Vocabulary: {}", self.vocabulary_size),
            format!("Duration:   {} ms", self.duration_ms),
        ]
    }
}

impl HumanReadable for ClassificationResult {
    fn to_human(&self) -> Vec<String> {
        if self.scores.is_empty() {
            return vec!["No label could be scored.".to_string()];
        }

        let width = self
            .scores
            .iter()
            .map(|s| s.label.chars().count())
            .max()
            .unwrap_or(0);

        self.scores
            .iter()
            .enumerate()
            .map(|(rank, s)| format!("{:>3}. {:<width$}  {:.6}", rank + 1, s.label, s.score))
            .collect()
    }
}

impl HumanReadable for ModelStats {
    fn to_human(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Model:      {}", self.model_path),
            format!("Documents:  {}", self.total_documents),
            format!("Vocabulary: {}", self.vocabulary_size),
            String::new(),
            format!(
                "{:<20} {:>10} {:>10} {:>10}",
                "label", "documents", "tokens", "distinct"
            ),
        ];
        lines.extend(self.labels.iter().map(|l| {
            format!(
                "{:<20} {:>10} {:>10} {:>10}",
                l.label, l.documents, l.tokens, l.distinct_tokens
            )
        }));
        lines
    }
}

/// Format a result in the requested output format.
pub fn format_result<T: HumanReadable>(
    message: &str,
    result: &T,
    args: &SieveArgs,
) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => {
            let mut lines = Vec::new();
            if args.verbosity() > 1 {
                lines.push(message.to_string());
                lines.push(String::new());
            }
            lines.extend(result.to_human());
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            if args.pretty {
                Ok(serde_json::to_string_pretty(result)?)
            } else {
                Ok(serde_json::to_string(result)?)
            }
        }
    }
}

/// Print a result in the requested output format.
pub fn output_result<T: HumanReadable>(message: &str, result: &T, args: &SieveArgs) -> Result<()> {
    if args.verbosity() == 0 && args.output_format == OutputFormat::Human {
        return Ok(());
    }
    println!("{}", format_result(message, result, args)?);
    Ok(())
}
