use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use eduagent::banner;
use eduagent::config::{AppConfig, PacingMode};
use eduagent::controller::{PipelineController, RunOutcome};
use eduagent::errors::Result;
use eduagent::models::PipelineResponse;
use eduagent::pacing::TokioPacer;
use eduagent::service::{GenerationService, HttpGenerationService};
use eduagent::view::{HtmlView, TerminalView};

#[derive(Parser)]
#[command(name = "eduagent")]
#[command(about = "Generate, review and refine lesson content through the EduAgent service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the generation service (overrides EDUAGENT_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for one grade and topic
    Run {
        /// Grade level, 1-12
        #[arg(long)]
        grade: String,

        /// Topic to generate content about
        #[arg(long)]
        topic: String,

        /// Also write the rendered page to this HTML file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Skip the staged pauses between steps
        #[arg(long)]
        no_pacing: bool,
    },

    /// Render a saved /generate response without calling the service
    Render {
        /// Path to the response JSON
        response: PathBuf,

        /// Also write the rendered page to this HTML file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Check that the generation service is reachable
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    banner::print_banner();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\u{274c} {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::from_env()?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }

    match cli.command {
        Commands::Run { grade, topic, html, no_pacing } => {
            if no_pacing {
                config.pacing_mode = PacingMode::Off;
            }
            let service = HttpGenerationService::from_config(&config)?;
            let controller = PipelineController::new(
                service,
                (TerminalView::stdout(), HtmlView::new()),
                TokioPacer,
                config.effective_pacing(),
            );

            let outcome = controller.trigger(&grade, &topic).await;

            let (_, html_view) = controller.into_view();
            if let Some(path) = html {
                html_view.write_to(&path)?;
            }

            match outcome {
                RunOutcome::Completed(report) => {
                    println!(
                        "\n\u{23f1}\u{fe0f}  Pipeline finished in {}ms (service {}ms)",
                        report.total_latency_ms, report.request_latency_ms
                    );
                    log::debug!("Run report: {}", serde_json::to_string(&report)?);
                    Ok(ExitCode::SUCCESS)
                }
                RunOutcome::Failed(_) | RunOutcome::Ignored => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Render { response, html } => {
            let contents = std::fs::read_to_string(&response)?;
            let parsed: PipelineResponse = serde_json::from_str(&contents)?;

            let service = HttpGenerationService::from_config(&config)?;
            let controller = PipelineController::new(
                service,
                (TerminalView::stdout(), HtmlView::new()),
                TokioPacer,
                config.effective_pacing(),
            );
            let presented = controller.present(&parsed);

            let (_, html_view) = controller.into_view();
            if let Some(path) = html {
                html_view.write_to(&path)?;
            }

            Ok(if presented.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Health => {
            let service = HttpGenerationService::from_config(&config)?;
            let health = service.health().await?;
            println!(
                "\u{2705} {} is {}",
                health.product.as_deref().unwrap_or(&config.api_base),
                health.status
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}
