use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lectern_common::{available_models, logger, AppConfig, ModelConfig};
use lectern_llm::{create_client, Summarizer, SummarizerOptions};
use lectern_quiz::{option_letter, QuizGenerator, QuizSet};
use lectern_source::{DefaultExtractor, Source, SourceExtractor};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Lectern - lecture summaries and quizzes from YouTube videos and documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Directory with the browser UI
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Summarize a YouTube video or text document
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Model preset (see `lectern models`)
        #[arg(long)]
        model: Option<String>,

        /// Also generate a quiz with this many questions
        #[arg(long)]
        quiz: Option<usize>,

        /// Write the summary to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a quiz from a summary file
    Quiz {
        /// Summary text file
        summary: PathBuf,

        /// Number of questions
        #[arg(long)]
        count: Option<usize>,

        /// Model preset
        #[arg(long)]
        model: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List model presets
    Models,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// YouTube URL or video id
    #[arg(long)]
    youtube: Option<String>,

    /// Document to summarize (.txt, .md, .pdf, .pptx)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn into_source(self) -> Result<Source> {
        match (self.youtube, self.file) {
            (Some(url), None) => Ok(Source::YouTube(url)),
            (None, Some(path)) => Ok(Source::Document(path)),
            _ => bail!("Specify exactly one of --youtube or --file"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    load_dotenv_from_project_root();

    let mut config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port, static_dir }) => {
            // Override with CLI arguments
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }
            config.validate()?;

            serve(config).await?;
        }
        None => {
            // Default: start server with default config
            serve(config).await?;
        }
        Some(Commands::Summarize {
            input,
            model,
            quiz,
            output,
            json,
        }) => {
            logger::setup_console_logging(&config.log_level)?;
            let source = input.into_source()?;
            summarize(&config, source, model.as_deref(), quiz, output, json).await?;
        }
        Some(Commands::Quiz {
            summary,
            count,
            model,
            json,
        }) => {
            logger::setup_console_logging(&config.log_level)?;
            let text = std::fs::read_to_string(&summary)
                .with_context(|| format!("Cannot read summary file {}", summary.display()))?;
            let count = check_question_count(&config, count)?;
            let model = config.model_config(model.as_deref())?;

            let quiz = generate_quiz(&config, &text, count, &model).await?;
            print_quiz(&quiz, json)?;
        }
        Some(Commands::Models) => {
            print_models(&config);
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Lectern starting...");
    tracing::info!("Configuration loaded: {:?}", config);

    println!("Server listening on http://{}", config.server_bind_address());

    lectern_server::start_server(config).await?;
    Ok(())
}

async fn summarize(
    config: &AppConfig,
    source: Source,
    model: Option<&str>,
    quiz_count: Option<usize>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let quiz_count = quiz_count
        .map(|count| check_question_count(config, Some(count)))
        .transpose()?;
    let model = config.model_config(model)?;

    let extractor = DefaultExtractor::from_config(config);
    let extracted = extractor.extract_text(&source).await?;
    tracing::info!(
        "Extracted {} chars from {}",
        extracted.char_count(),
        extracted.source_label
    );

    let client = create_client(model.provider, config)?;
    let summarizer = Summarizer::new(client, SummarizerOptions::from_config(config));

    // Ctrl-C abandons pending model calls
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let summary = summarizer
        .summarize_cancellable(&extracted.text, &model, &cancel)
        .await?;

    if !summary.unavailable_chunks.is_empty() {
        eprintln!(
            "Warning: {} of {} sections could not be summarized",
            summary.unavailable_chunks.len(),
            summary.chunks_processed
        );
    }

    let rendered = if json {
        serde_json::to_string_pretty(&summary)?
    } else {
        summary.text.clone()
    };

    match &output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!("Summary written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if let Some(count) = quiz_count {
        let quiz = generate_quiz(config, &summary.text, count, &model).await?;
        println!();
        print_quiz(&quiz, json)?;
    }

    Ok(())
}

async fn generate_quiz(config: &AppConfig, summary: &str, count: usize, model: &ModelConfig) -> Result<QuizSet> {
    let client = create_client(model.provider, config)?;
    let quiz = QuizGenerator::new(client)
        .generate_quiz(summary, count, model)
        .await?;
    Ok(quiz)
}

fn check_question_count(config: &AppConfig, count: Option<usize>) -> Result<usize> {
    let count = count.unwrap_or(config.default_num_questions);
    if count == 0 || count > config.max_questions {
        bail!("Question count must be between 1 and {}", config.max_questions);
    }
    Ok(count)
}

fn print_quiz(quiz: &QuizSet, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(quiz)?);
        return Ok(());
    }

    for (i, question) in quiz.questions().iter().enumerate() {
        println!("{}. {}", i + 1, question.question());
        for (j, option) in question.options().iter().enumerate() {
            println!("   {}) {}", option_letter(j), option);
        }
        println!(
            "   Answer: {}) {}",
            option_letter(question.correct_index()),
            question.correct_option()
        );
        if let Some(explanation) = question.explanation() {
            println!("   {}", explanation);
        }
        println!();
    }

    Ok(())
}

fn print_models(config: &AppConfig) {
    for preset in available_models() {
        let marker = if preset.name.eq_ignore_ascii_case(&config.default_model) {
            "*"
        } else {
            " "
        };
        let status = if config.api_key(preset.provider).is_some() {
            "ready"
        } else {
            "no API key"
        };
        println!(
            "{} {:<20} {:<10} {:<20} {}",
            marker,
            preset.name,
            preset.provider.to_string(),
            preset.model_name,
            status
        );
    }
}
