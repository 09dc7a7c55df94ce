use crate::infra::{load_catalog, sample_catalog, InMemoryResultRepository};
use clap::Args;
use quizmatch::error::AppError;
use quizmatch::matching::catalog::answers_from_path;
use quizmatch::matching::{
    Answer, Gender, ResolvedResult, ResultService, ResultSubmission, TestId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Test identifier within the catalog
    #[arg(long)]
    pub(crate) test: String,
    /// Answer sheet CSV with question_id,choice_id[,score][,code] columns
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Catalog JSON file (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Respondent gender used for result targeting
    #[arg(long, value_parser = crate::infra::parse_gender)]
    pub(crate) gender: Option<Gender>,
    /// Print the public JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Respondent gender applied to every sample
    #[arg(long, value_parser = crate::infra::parse_gender)]
    pub(crate) gender: Option<Gender>,
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let ResolveArgs {
        test,
        answers,
        catalog,
        gender,
        json,
    } = args;

    let catalog = load_catalog(catalog.as_deref())?;
    let answers = answers_from_path(&answers)?;
    let service = ResultService::new(Arc::new(InMemoryResultRepository::from_catalog(catalog)));

    let resolved = service.resolve(&TestId(test), ResultSubmission { answers, gender })?;

    if json {
        match serde_json::to_string_pretty(&resolved.view()) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Result payload unavailable: {err}"),
        }
    } else {
        render_resolution(&resolved);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { gender } = args;
    let service = ResultService::new(Arc::new(InMemoryResultRepository::from_catalog(
        sample_catalog()?,
    )));

    println!("Result matching demo");
    if let Some(gender) = &gender {
        println!("Respondent gender: {}", gender.label());
    }

    let samples: [(&str, &[&str]); 7] = [
        ("temperament", &["a", "a", "a"]),
        ("temperament", &["b", "b", "b"]),
        ("temperament", &["a", "b", "b"]),
        ("temperament", &["b", "a", "b"]),
        ("energy", &["a", "a"]),
        ("energy", &["b", "b"]),
        ("energy", &["a", "b"]),
    ];

    for (test, choices) in samples {
        let answers = choices
            .iter()
            .enumerate()
            .map(|(index, choice)| Answer::new(format!("q{}", index + 1), *choice))
            .collect();
        let test_id = TestId::from(test);

        let submission = ResultSubmission {
            answers,
            gender: gender.clone(),
        };

        match service.resolve(&test_id, submission) {
            Ok(resolved) => println!(
                "- {} [{}] -> {} via {} (score {})",
                test_id,
                choices.join(", "),
                resolved.outcome.result.name,
                resolved.outcome.strategy.label(),
                resolved.outcome.total_score
            ),
            Err(err) => println!("- {} [{}] -> unavailable: {}", test_id, choices.join(", "), err),
        }
    }

    Ok(())
}

fn render_resolution(resolved: &ResolvedResult) {
    let outcome = &resolved.outcome;
    println!("Test {}", resolved.test_id);
    println!(
        "Result: {} ({})",
        outcome.result.name, outcome.result.id
    );
    if !outcome.result.description.is_empty() {
        println!("  {}", outcome.result.description);
    }
    println!("Matched via {}", outcome.strategy.label());
    println!("Total score: {}", outcome.total_score);

    if outcome.dominant_codes.is_empty() {
        println!("Codes: none");
    } else {
        let ranked = outcome
            .dominant_codes
            .iter()
            .map(|entry| format!("{}x{}", entry.code, entry.count))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Codes: {ranked}");
    }
}
