//! Command implementations for the Sieve CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use serde::Deserialize;

use crate::analysis::char_filter::MarkupStripCharFilter;
use crate::analysis::tokenizer::{
    PunctuationTokenizer, Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer,
};
use crate::classifier::{Classifier, ClassifierConfig};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;

/// One line of training data.
#[derive(Debug, Deserialize)]
pub struct TrainingSample {
    pub label: String,
    pub text: String,
}

/// Execute a CLI command.
pub fn execute_command(args: SieveArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Classify(classify_args) => classify_text(classify_args, &args),
        Command::Inspect(inspect_args) => inspect_model(inspect_args, &args),
    }
}

/// Build a classifier from the analysis options.
pub fn build_classifier(analysis: &AnalysisArgs) -> Result<Classifier> {
    let config = match &analysis.config {
        Some(path) => ClassifierConfig::from_json(&fs::read_to_string(path)?)?,
        None => ClassifierConfig::default(),
    };

    let tokenizer: Arc<dyn Tokenizer> = match analysis.tokenizer {
        TokenizerKind::Punctuation => Arc::new(PunctuationTokenizer::new()),
        TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer::new()),
        TokenizerKind::UnicodeWord => Arc::new(UnicodeWordTokenizer::new()),
    };

    let classifier = Classifier::with_config(tokenizer, config)?;
    if analysis.strip_markup {
        Ok(classifier.with_sanitizer(Arc::new(MarkupStripCharFilter::new())))
    } else {
        Ok(classifier)
    }
}

/// Train the classifier from a JSON Lines file.
///
/// Lines that are blank are ignored; lines that do not parse are skipped with
/// a warning. Returns the number of documents trained and lines skipped.
pub fn train_from_jsonl(classifier: &mut Classifier, path: &Path) -> Result<(usize, usize)> {
    let reader = BufReader::new(File::open(path)?);
    let mut trained = 0;
    let mut skipped = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<TrainingSample>(&line) {
            Ok(sample) => {
                classifier.train(&sample.label, &sample.text);
                trained += 1;
            }
            Err(e) => {
                warn!("Skipping line {} of {}: {e}", line_num + 1, path.display());
                skipped += 1;
            }
        }
    }

    Ok((trained, skipped))
}

fn train_model(args: &TrainArgs, cli_args: &SieveArgs) -> Result<()> {
    let start_time = Instant::now();
    let mut classifier = build_classifier(&args.analysis)?;

    if let Some(existing) = &args.append {
        info!("Continuing from {}", existing.display());
        classifier.load_from_path(existing)?;
    }

    info!("Training from {}", args.data_file.display());
    let (documents_trained, lines_skipped) = train_from_jsonl(&mut classifier, &args.data_file)?;
    let model_path = classifier.save_to_dir(&args.model_dir, &args.name)?;

    output_result(
        "Model trained successfully",
        &TrainingResult {
            model_path: model_path.to_string_lossy().to_string(),
            documents_trained,
            lines_skipped,
            labels: classifier.labels().len(),
            vocabulary_size: classifier.vocabulary_size(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn classify_text(args: &ClassifyArgs, cli_args: &SieveArgs) -> Result<()> {
    let mut classifier = build_classifier(&args.analysis)?;
    let mut scores = classifier.classify_from_model(&args.text, &args.model)?;
    if let Some(limit) = args.limit {
        scores.truncate(limit);
    }

    output_result(
        "Classification results",
        &ClassificationResult {
            model_path: args.model.to_string_lossy().to_string(),
            scores,
        },
        cli_args,
    )
}

fn inspect_model(args: &InspectArgs, cli_args: &SieveArgs) -> Result<()> {
    let mut classifier = Classifier::default();
    classifier.load_from_path(&args.model)?;
    let snapshot = classifier.snapshot();

    let labels = snapshot
        .docs
        .iter()
        .map(|(label, documents)| LabelStats {
            label: label.clone(),
            documents: *documents,
            tokens: classifier.label_token_total(label),
            distinct_tokens: snapshot.data.get(label).map_or(0, |tokens| tokens.len()),
        })
        .collect();

    output_result(
        "Model statistics",
        &ModelStats {
            model_path: args.model.to_string_lossy().to_string(),
            total_documents: classifier.total_documents(),
            vocabulary_size: classifier.vocabulary_size(),
            labels,
        },
        cli_args,
    )
}
