use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use meddoc::analysis::{AnalysisResult, Analyzer};
use meddoc::config::{AnalyzerSettings, BackendConfig};
use meddoc::extract::ExtractionResult;
use meddoc::input::decode_text;
use meddoc::lang::Language;
use meddoc::llm::client::DeepSeekClient;
use meddoc::pipeline::{self, Pipeline, PipelineOutcome, RequestOptions};
use meddoc::prompt::OutputMode;
use meddoc::{USER_AGENT, report};

#[derive(Parser)]
#[command(name = "meddoc", version, about = "Interpret medical documents with an LLM, in English and Chinese")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract plain text from PDF or Word documents
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract and analyze documents
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Documents processed concurrently
        #[arg(short, long, default_value_t = 2)]
        jobs: usize,
    },
    /// Analyze text given as an argument or on stdin
    Text {
        text: Option<String>,
        #[command(flatten)]
        analysis: AnalysisArgs,
    },
    /// Process a document the way an upload is handled: staged copy,
    /// preview, and a shortened analysis
    Upload {
        file: PathBuf,
        /// Filename to report instead of the path's own
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
}

#[derive(Args)]
struct AnalysisArgs {
    /// Document language; detected when omitted
    #[arg(long, value_enum)]
    lang: Option<Language>,
    /// Output layout; overrides MEDDOC_OUTPUT_MODE
    #[arg(long, value_enum)]
    mode: Option<OutputMode>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    /// Print the parsed section outline after the analysis
    #[arg(long)]
    sections: bool,
}

#[derive(Serialize)]
struct FileExtraction<'a> {
    path: String,
    #[serde(flatten)]
    result: &'a ExtractionResult,
}

#[derive(Serialize)]
struct FileOutcome<'a> {
    path: String,
    #[serde(flatten)]
    outcome: &'a PipelineOutcome,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let directive = if verbose { "meddoc=debug" } else { "meddoc=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();
    Ok(())
}

/// Returns whether every document succeeded.
async fn run(command: Command) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Command::Extract { files, json } => Ok(extract(&files, json).await),
        Command::Analyze {
            files,
            analysis,
            jobs,
        } => {
            let pipeline = build_pipeline(analysis.mode)?;
            Ok(analyze_files(&pipeline, &files, &analysis, jobs).await)
        }
        Command::Text { text, analysis } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut bytes = Vec::new();
                    std::io::stdin().read_to_end(&mut bytes)?;
                    decode_text(&bytes).into_owned()
                }
            };
            let pipeline = build_pipeline(analysis.mode)?;
            let result = pipeline.analyze_medical_text(&text, analysis.lang).await;
            print_analysis(&result, &analysis)?;
            Ok(result.success)
        }
        Command::Upload { file, name, lang } => {
            let pipeline = build_pipeline(None)?;
            let bytes = tokio::fs::read(&file).await?;
            let filename = name.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            Ok(upload(&pipeline, &filename, &bytes, lang).await?)
        }
    }
}

/// A rejected or unreadable upload is a failed document, not a setup error.
async fn upload(
    pipeline: &Pipeline<DeepSeekClient>,
    filename: &str,
    bytes: &[u8],
    lang: Option<Language>,
) -> Result<bool, serde_json::Error> {
    match pipeline.process_upload(filename, bytes, lang).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report.analysis.as_ref().is_some_and(|a| a.success))
        }
        Err(e) => {
            error!(filename, kind = %e.kind(), error = %e, "upload failed");
            eprintln!("{filename}: {e}");
            Ok(false)
        }
    }
}

fn build_pipeline(
    mode: Option<OutputMode>,
) -> Result<Pipeline<DeepSeekClient>, Box<dyn std::error::Error>> {
    let backend = BackendConfig::from_env()?;
    let mut settings = AnalyzerSettings::from_env()?;
    if let Some(mode) = mode {
        settings.mode = mode;
    }

    let http = Client::builder().user_agent(USER_AGENT).build()?;
    let client = DeepSeekClient::new(http, &backend);
    info!(model = %backend.model, mode = %settings.mode, "backend configured");
    Ok(Pipeline::new(Analyzer::new(client, settings)))
}

async fn extract(files: &[PathBuf], json: bool) -> bool {
    let mut all_ok = true;
    for path in pipeline::resolve_paths(files) {
        let result = pipeline::extract_text(&path).await;
        all_ok &= result.is_ok();

        if json {
            let entry = FileExtraction {
                path: path.display().to_string(),
                result: &result,
            };
            match serde_json::to_string(&entry) {
                Ok(line) => println!("{line}"),
                Err(e) => error!(error = %e, "failed to serialize result"),
            }
            continue;
        }

        match (&result.text, &result.error) {
            (Some(text), _) => {
                println!("==> {} <==", path.display());
                println!("{text}");
            }
            (None, Some(e)) => eprintln!("{}: {e}", path.display()),
            (None, None) => {}
        }
    }
    all_ok
}

async fn analyze_files(
    pipeline: &Pipeline<DeepSeekClient>,
    files: &[PathBuf],
    args: &AnalysisArgs,
    jobs: usize,
) -> bool {
    let options = RequestOptions {
        language: args.lang,
        max_chars: None,
    };
    let paths = pipeline::resolve_paths(files);

    let outcomes: Vec<(PathBuf, PipelineOutcome)> = stream::iter(paths)
        .map(|path| async move {
            let outcome = pipeline.process_file(&path, options).await;
            (path, outcome)
        })
        .buffer_unordered(jobs.max(1))
        .collect()
        .await;

    let mut all_ok = true;
    for (path, outcome) in &outcomes {
        all_ok &= outcome.stage == pipeline::Stage::Complete;

        if args.json {
            let entry = FileOutcome {
                path: path.display().to_string(),
                outcome,
            };
            match serde_json::to_string(&entry) {
                Ok(line) => println!("{line}"),
                Err(e) => error!(error = %e, "failed to serialize result"),
            }
            continue;
        }

        println!("==> {} <==", path.display());
        match (&outcome.extraction.error, &outcome.analysis) {
            (Some(e), _) => eprintln!("{e}"),
            (None, Some(result)) => {
                if let Err(e) = print_analysis(result, args) {
                    error!(error = %e, "failed to print analysis");
                }
            }
            (None, None) => {}
        }
    }
    all_ok
}

fn print_analysis(
    result: &AnalysisResult,
    args: &AnalysisArgs,
) -> Result<(), serde_json::Error> {
    if args.json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    let Some(analysis) = &result.analysis else {
        eprintln!("{}", result.error.as_deref().unwrap_or("analysis failed"));
        return Ok(());
    };

    println!("{analysis}");
    if let Some(disclaimer) = &result.disclaimer {
        println!("\n---\n{disclaimer}");
    }

    if args.sections {
        let parsed = report::parse_sections(analysis);
        println!("\n---");
        for section in &parsed.sections {
            println!(
                "{}. {} ({} points)",
                section.number,
                section.title,
                section.bullets.len()
            );
        }
        if !parsed.is_complete() {
            eprintln!("warning: analysis does not contain all seven sections");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meddoc::config::ApiKey;
    use std::time::Duration;

    fn offline_pipeline() -> Pipeline<DeepSeekClient> {
        let backend = BackendConfig {
            api_key: ApiKey::new("test-key"),
            base_url: "http://127.0.0.1:9".parse().unwrap(),
            model: "deepseek-chat".into(),
            timeout: Duration::from_secs(1),
        };
        let client = DeepSeekClient::new(Client::new(), &backend).with_max_attempts(1);
        Pipeline::new(Analyzer::new(client, AnalyzerSettings::default()))
    }

    #[tokio::test]
    async fn disallowed_upload_is_a_document_failure() {
        let pipeline = offline_pipeline();
        assert!(!upload(&pipeline, "notes.txt", b"LDL 4.1", None).await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_upload_is_a_document_failure() {
        let pipeline = offline_pipeline();
        assert!(!upload(&pipeline, "lab.pdf", b"not a pdf", None).await.unwrap());
    }

    #[test]
    fn mode_flag_overrides_configured_mode() {
        let cli = Cli::try_parse_from(["meddoc", "text", "ALT 40", "--mode", "monolingual"]).unwrap();
        let Command::Text { analysis, .. } = cli.command else {
            panic!("expected text subcommand");
        };
        assert_eq!(analysis.mode, Some(OutputMode::Monolingual));
    }
}
