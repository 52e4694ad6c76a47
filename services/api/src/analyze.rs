use crate::infra::{CaseFile, InMemoryDisputeRepository};
use chargeback_ai::config::AppConfig;
use chargeback_ai::error::AppError;
use chargeback_ai::telemetry;
use chargeback_ai::workflows::disputes::{AgentDecision, DisputeAnalysisService, DisputeId};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file with `cases` and `customers` arrays
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Seed for the confidence jitter; overrides CHARGEBACK_CONFIDENCE_SEED
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Only analyse these dispute ids (repeatable). Defaults to every case in the file.
    #[arg(long = "dispute-id")]
    pub(crate) dispute_ids: Vec<String>,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(seed) = args.seed {
        config.assessment.confidence_seed = Some(seed);
    }
    telemetry::init(&config.telemetry)?;

    let file = CaseFile::load(&args.input)?;
    let decisions = analyze_file(file, &args.dispute_ids, &config)?;

    info!(
        input = %args.input.display(),
        analysed = decisions.len(),
        "offline analysis finished"
    );
    println!("{}", serde_json::to_string_pretty(&decisions)?);
    Ok(())
}

fn analyze_file(
    file: CaseFile,
    only: &[String],
    config: &AppConfig,
) -> Result<Vec<AgentDecision>, AppError> {
    let ids = if only.is_empty() {
        file.dispute_ids()
    } else {
        only.iter().cloned().map(DisputeId).collect()
    };

    let engine = config.assessment.engine()?;
    let repository = Arc::new(InMemoryDisputeRepository::from_case_file(file));
    let service = DisputeAnalysisService::with_engine(repository, engine);

    // Sequential so a seeded run draws confidence in file order.
    let decisions = ids
        .iter()
        .filter_map(|id| match service.analyze(id) {
            Ok(decision) => Some(decision),
            Err(err) => {
                warn!(dispute_id = %id, error = %err, "skipping dispute");
                None
            }
        })
        .collect();
    Ok(decisions)
}
