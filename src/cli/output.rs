//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{NomadiaArgs, OutputFormat};
use crate::error::Result;
use crate::knowledge::retriever::IntentResolution;
use crate::ml::intent::Intent;
use crate::ml::metrics::ClassificationReport;
use crate::ml::trainer::TrainingSummary;

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub summary: TrainingSummary,
    pub report: ClassificationReport,
}

/// Probability of one intent for a query.
#[derive(Debug, Serialize, Deserialize)]
pub struct IntentProbability {
    pub intent: Intent,
    pub probability: f64,
}

/// Result structure for classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub query: String,
    pub intent: Intent,
    pub probabilities: Vec<IntentProbability>,
}

/// Result structure for retrieval.
#[derive(Debug, Serialize)]
pub struct RetrievalResult {
    pub query: String,
    pub classifier_loaded: bool,
    pub resolution: IntentResolution,
    pub matched: Vec<String>,
    pub context: String,
}

/// Short description of a knowledge base entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    pub id: String,
    pub category: Intent,
    pub keywords: Vec<String>,
    pub images: usize,
    pub coordinates: Option<String>,
}

/// Result structure for listing the knowledge base.
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeListing {
    pub source: String,
    pub entries: Vec<KnowledgeSummary>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &NomadiaArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &NomadiaArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    let type_name = std::any::type_name::<T>();

    if type_name.ends_with("TrainingResult") {
        output_training_human(&value)
    } else if type_name.ends_with("ClassificationResult") {
        output_classification_human(&value)
    } else if type_name.ends_with("RetrievalResult") {
        output_retrieval_human(&value)
    } else if type_name.ends_with("KnowledgeListing") {
        output_knowledge_human(&value)
    } else if type_name.ends_with("GenerationRequest") {
        output_request_human(&value)
    } else {
        output_generic_human(&value)
    }
}

/// Output a training run in human format.
fn output_training_human(value: &serde_json::Value) -> Result<()> {
    if let Some(summary) = value.get("summary").and_then(|s| s.as_object()) {
        println!("Training Summary:");
        println!("═════════════════");
        for key in ["corpus_size", "train_size", "test_size", "vocabulary_size"] {
            if let Some(count) = summary.get(key).and_then(|c| c.as_u64()) {
                println!("{}: {count}", key.replace('_', " "));
            }
        }
        if let Some(classes) = summary.get("classes") {
            println!("classes: {}", format_value(classes));
        }
    }

    if let Some(report) = value.get("report") {
        let report: ClassificationReport = serde_json::from_value(report.clone())?;
        println!();
        println!("{report}");
    }

    if let Some(path) = value.get("model_path").and_then(|p| p.as_str()) {
        println!();
        println!("Model saved to: {path}");
    }
    Ok(())
}

/// Output a classification in human format.
fn output_classification_human(value: &serde_json::Value) -> Result<()> {
    if let Some(intent) = value.get("intent").and_then(|i| i.as_str()) {
        println!("Intent: {intent}");
    }

    if let Some(probabilities) = value.get("probabilities").and_then(|p| p.as_array()) {
        println!();
        for entry in probabilities {
            let intent = entry.get("intent").and_then(|i| i.as_str()).unwrap_or("?");
            let probability = entry
                .get("probability")
                .and_then(|p| p.as_f64())
                .unwrap_or(0.0);
            println!("  {intent:<10} {}", format_probability(probability));
        }
    }
    Ok(())
}

/// Output a retrieval in human format.
fn output_retrieval_human(value: &serde_json::Value) -> Result<()> {
    let loaded = value
        .get("classifier_loaded")
        .and_then(|l| l.as_bool())
        .unwrap_or(false);
    println!(
        "Classifier: {}",
        if loaded { "loaded" } else { "unavailable" }
    );

    if let Some(resolution) = value.get("resolution") {
        println!("Intent: {}", format_resolution(resolution));
    }

    if let Some(matched) = value.get("matched") {
        println!("Matched: {}", format_value(matched));
    }

    if let Some(context) = value.get("context").and_then(|c| c.as_str()) {
        println!();
        if context.is_empty() {
            println!("(empty context)");
        } else {
            println!("{context}");
        }
    }
    Ok(())
}

/// Output the knowledge base listing in human format.
fn output_knowledge_human(value: &serde_json::Value) -> Result<()> {
    if let Some(source) = value.get("source").and_then(|s| s.as_str()) {
        println!("Knowledge base: {source}");
        println!("═══════════════");
    }

    if let Some(entries) = value.get("entries").and_then(|e| e.as_array()) {
        for entry in entries {
            let id = entry.get("id").and_then(|i| i.as_str()).unwrap_or("?");
            let category = entry
                .get("category")
                .and_then(|c| c.as_str())
                .unwrap_or("?");
            println!();
            println!("{id} ({category})");
            if let Some(keywords) = entry.get("keywords") {
                println!("  keywords: {}", format_value(keywords));
            }
            if let Some(images) = entry.get("images").and_then(|i| i.as_u64())
                && images > 0
            {
                println!("  images: {images}");
            }
            if let Some(coordinates) = entry.get("coordinates").and_then(|c| c.as_str()) {
                println!("  gps: {coordinates}");
            }
        }
        println!();
        println!("Total entries: {}", entries.len());
    }
    Ok(())
}

/// Output a language-model request in human format.
fn output_request_human(value: &serde_json::Value) -> Result<()> {
    if let Some(instruction) = value.get("system_instruction").and_then(|s| s.as_str()) {
        println!("System instruction:");
        println!("───────────────────");
        println!("{instruction}");
    }

    if let Some(contents) = value.get("contents").and_then(|c| c.as_array()) {
        println!();
        println!("Conversation:");
        println!("─────────────");
        for content in contents {
            let role = content.get("role").and_then(|r| r.as_str()).unwrap_or("?");
            let text = content
                .get("parts")
                .and_then(|p| p.as_array())
                .map(|parts| {
                    parts
                        .iter()
                        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default();
            println!("[{role}] {text}");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &NomadiaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a serialized [`IntentResolution`].
fn format_resolution(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) if s == "wildcard" => "general (wildcard)".to_string(),
        serde_json::Value::String(s) if s == "keyword_only" => {
            "none (classifier failed, keywords only)".to_string()
        }
        serde_json::Value::Object(obj) => match obj.get("predicted").and_then(|p| p.as_str()) {
            Some(intent) => format!("{intent} (predicted)"),
            None => format_value(value),
        },
        _ => format_value(value),
    }
}

/// Format a probability as a percentage.
fn format_probability(probability: f64) -> String {
    format!("{:>6.2}%", probability * 100.0)
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}
