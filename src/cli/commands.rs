//! Command implementations for the Nomadia CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::AppConfig;
use crate::error::Result;
use crate::knowledge::{ContextRetriever, KnowledgeBase};
use crate::ml::classifier::{ClassifierState, IntentClassifier, IntentModel};
use crate::ml::corpus::CorpusDefinition;
use crate::ml::trainer::Trainer;
use crate::prompt::{self, ChatTurn};

/// Execute a CLI command.
pub fn execute_command(args: NomadiaArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), config, &args),
        Command::Classify(classify_args) => classify(classify_args.clone(), config, &args),
        Command::Retrieve(retrieve_args) => retrieve(retrieve_args.clone(), config, &args),
        Command::Prompt(prompt_args) => build_prompt(prompt_args.clone(), config, &args),
        Command::Knowledge(knowledge_args) => list_knowledge(knowledge_args.clone(), config, &args),
    }
}

/// Load the configuration file, or fall back to the defaults.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            AppConfig::load(path)
        }
        None => Ok(AppConfig::default()),
    }
}

/// Apply a command-line knowledge base path over the configured one.
fn knowledge_base(path: Option<PathBuf>, mut config: AppConfig) -> Result<(KnowledgeBase, String)> {
    if path.is_some() {
        config.knowledge_base_path = path;
    }
    let source = config
        .knowledge_base_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    Ok((config.knowledge_base()?, source))
}

/// Build a retriever around the model at `model` (or the configured path).
fn context_retriever(
    model: Option<PathBuf>,
    knowledge_base_path: Option<PathBuf>,
    config: AppConfig,
) -> Result<ContextRetriever> {
    let model_path = model.unwrap_or_else(|| config.model_path.clone());
    let (knowledge_base, source) = knowledge_base(knowledge_base_path, config)?;
    debug!(
        "Using knowledge base {source} with {} entries",
        knowledge_base.len()
    );

    let classifier = ClassifierState::load(&model_path);
    Ok(ContextRetriever::new(Arc::new(knowledge_base), classifier))
}

/// Generate the corpus, train, evaluate and save the model.
fn train(args: TrainArgs, mut config: AppConfig, cli_args: &NomadiaArgs) -> Result<()> {
    if let Some(corpus) = args.corpus {
        config.corpus_path = Some(corpus);
    }
    if let Some(output) = args.output {
        config.model_path = output;
    }
    if let Some(seed) = args.seed {
        config.trainer.seed = seed;
    }
    if let Some(test_ratio) = args.test_ratio {
        config.trainer.test_ratio = test_ratio;
    }
    if let Some(alpha) = args.alpha {
        config.trainer.alpha = alpha;
    }

    let definition: CorpusDefinition = config.corpus()?;
    info!(
        "Training on {} keywords and {} templates",
        definition.keyword_count(),
        definition.templates.len()
    );

    let trainer = Trainer::new(config.trainer.clone())?;
    let outcome = trainer.train_and_save(&definition, &config.model_path)?;

    output_result(
        "Model trained successfully",
        &TrainingResult {
            model_path: config.model_path.display().to_string(),
            summary: outcome.summary,
            report: outcome.report,
        },
        cli_args,
    )
}

/// Predict the intent of a query with an explicitly loaded model.
fn classify(args: ClassifyArgs, config: AppConfig, cli_args: &NomadiaArgs) -> Result<()> {
    let model_path = args.model.unwrap_or(config.model_path);
    let model = IntentModel::load(&model_path)?;

    let intent = model.predict(&args.query)?;
    let probabilities = model
        .predict_proba(&args.query)?
        .into_iter()
        .map(|(intent, probability)| IntentProbability {
            intent,
            probability,
        })
        .collect();

    output_result(
        "Query classified",
        &ClassificationResult {
            query: args.query,
            intent,
            probabilities,
        },
        cli_args,
    )
}

/// Build and show the grounding context of a query.
fn retrieve(args: RetrieveArgs, config: AppConfig, cli_args: &NomadiaArgs) -> Result<()> {
    let retriever = context_retriever(args.model, args.knowledge_base, config)?;
    let retrieval = retriever.retrieve_detailed(&args.query);

    output_result(
        "Context retrieved",
        &RetrievalResult {
            query: args.query,
            classifier_loaded: retriever.classifier_state().is_loaded(),
            resolution: retrieval.resolution,
            matched: retrieval.matched,
            context: retrieval.context,
        },
        cli_args,
    )
}

/// Build the language-model request for a message and an optional history.
fn build_prompt(args: PromptArgs, config: AppConfig, cli_args: &NomadiaArgs) -> Result<()> {
    let history = match &args.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };
    let retriever = context_retriever(args.model, args.knowledge_base, config)?;
    let request = prompt::compose(&retriever, &history, &args.message);

    output_result("Request built", &request, cli_args)
}

/// Read a chat history file.
fn load_history(path: &Path) -> Result<Vec<ChatTurn>> {
    let content = fs::read_to_string(path)?;
    let history: Vec<ChatTurn> = serde_json::from_str(&content)?;
    debug!("Loaded {} history turns from {}", history.len(), path.display());
    Ok(history)
}

/// List the entries of the knowledge base.
fn list_knowledge(args: KnowledgeArgs, config: AppConfig, cli_args: &NomadiaArgs) -> Result<()> {
    let (knowledge_base, source) = knowledge_base(args.knowledge_base, config)?;

    let entries = knowledge_base
        .iter()
        .map(|entry| KnowledgeSummary {
            id: entry.id.clone(),
            category: entry.category,
            keywords: entry.keywords.clone(),
            images: entry.images.len(),
            coordinates: entry.coordinates.clone(),
        })
        .collect();

    output_result(
        "Knowledge base loaded",
        &KnowledgeListing { source, entries },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_history() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role": "user", "text": "Salut"}}, {{"role": "model", "text": "Bienvenue"}}]"#
        )
        .unwrap();

        let history = load_history(file.path()).unwrap();
        assert_eq!(history, vec![ChatTurn::user("Salut"), ChatTurn::model("Bienvenue")]);
    }

    #[test]
    fn test_knowledge_base_override() {
        let (base, source) = knowledge_base(None, AppConfig::default()).unwrap();
        assert_eq!(source, "built-in");
        assert_eq!(base.len(), 4);

        let missing = PathBuf::from("/nonexistent/knowledge_base.json");
        assert!(knowledge_base(Some(missing), AppConfig::default()).is_err());
    }

    #[test]
    fn test_retriever_without_model() {
        let dir = TempDir::new().unwrap();
        let retriever =
            context_retriever(Some(dir.path().join("missing.bin")), None, AppConfig::default())
                .unwrap();

        assert!(!retriever.classifier_state().is_loaded());
        assert!(retriever.retrieve("couscous").contains("SUJET: food"));
    }

    #[test]
    fn test_classify_requires_model() {
        let dir = TempDir::new().unwrap();
        let args = ClassifyArgs {
            query: "couscous".to_string(),
            model: Some(dir.path().join("missing.bin")),
        };
        let cli_args = NomadiaArgs::try_parse_from(["nomadia", "-q", "knowledge"]).unwrap();
        assert!(classify(args, AppConfig::default(), &cli_args).is_err());
    }
}
