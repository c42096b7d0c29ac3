use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use hts_encode::encode_with_report;
use hts_model::RiskOutcome;
use hts_scoring::{CancellationToken, ScoringClient, ScoringError, ScoringSettings};
use tracing::{info_span, warn};

use hts_cli::input::load_raw_input;
use hts_cli::render::{features_table, outcome_line, outcome_table, vector_table};

use crate::cli::{AssessArgs, ClassifyArgs, EncodeArgs};

pub fn run_features() {
    println!("{}", features_table());
}

pub fn run_encode(args: &EncodeArgs) -> Result<()> {
    let _span = info_span!("encode", input = %args.input.display()).entered();
    let input = load_raw_input(&args.input)?;
    let encoding = encode_with_report(&input);
    for field in &encoding.report.unrecognized {
        warn!(field = %field, "unrecognised value left at default");
    }
    if args.table {
        println!("{}", vector_table(&encoding.vector));
    } else {
        let json =
            serde_json::to_string_pretty(&encoding.vector).context("serialize feature vector")?;
        println!("{json}");
    }
    Ok(())
}

pub fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let thresholds = match &args.config {
        Some(path) => ScoringSettings::load(path)?.thresholds,
        None => hts_model::RiskThresholds::default(),
    };
    let assessment = thresholds
        .assess(args.probability)
        .context("classify probability")?;
    let outcome = RiskOutcome::Scored(assessment);
    print_outcome(&outcome, args.json)
}

/// Runs a remote assessment; `Err` carries the typed scoring failure.
pub fn run_assess(args: &AssessArgs) -> Result<std::result::Result<RiskOutcome, ScoringError>> {
    let _span = info_span!("assess", input = %args.input.display()).entered();
    let mut settings = ScoringSettings::load(&args.config)?;
    if let Some(endpoint) = &args.endpoint {
        settings = settings.with_endpoint(endpoint.clone());
    }
    if let Some(facility) = &args.facility {
        settings = settings.with_facility_id(facility.clone());
    }
    if let Some(secs) = args.timeout_secs {
        settings = settings.with_timeout(Duration::from_secs(secs));
    }
    settings.validate()?;

    let input = load_raw_input(&args.input)?;
    let encoding = encode_with_report(&input);
    for field in &encoding.report.unrecognized {
        warn!(field = %field, "unrecognised value left at default");
    }

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let deadline = settings.timeout();
    let client = ScoringClient::new(settings)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let result = runtime.block_on(async {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                trigger.cancel();
            }
        });
        client
            .assess_with(&encoding.vector, date, deadline, &token)
            .await
    });

    if let Ok(outcome) = &result {
        print_outcome(outcome, args.json)?;
    }
    Ok(result)
}

fn print_outcome(outcome: &RiskOutcome, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(outcome).context("serialize outcome")?;
        println!("{text}");
    } else if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        println!("{}", outcome_table(outcome));
    } else {
        println!("{}", outcome_line(outcome));
    }
    Ok(())
}
