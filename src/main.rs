use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use textwrap::{Options, wrap};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdant::content::quizgen;
use verdant::engine::QuizStatus;
use verdant::{
    ApiClient, Config, ContentLoader, Difficulty, FileStore, KeyValueStore, LearningPath,
    LoadedPath, ProgressStore, View,
};

const WRAP_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "verdant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Act as this learner instead of the configured one
    #[arg(long, global = true)]
    user: Option<String>,

    /// Skip the content API and use the bundled modules
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the modules of a learning path
    Modules {
        /// beginner, intermediate or expert
        difficulty: Difficulty,
    },
    /// Read a lesson of a module
    Lesson {
        difficulty: Difficulty,
        module: String,
        /// Lesson number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        lesson: usize,
    },
    /// Show the questions of a module's quiz
    Quiz {
        difficulty: Difficulty,
        module: String,
        /// Quiz number when the module has several, starting at 1
        #[arg(short, long, default_value_t = 1)]
        quiz: usize,
    },
    /// Submit answers for a module's quiz
    Submit {
        difficulty: Difficulty,
        module: String,
        /// Quiz number when the module has several, starting at 1
        #[arg(short, long, default_value_t = 1)]
        quiz: usize,
        /// Chosen option per question in order, starting at 1 (e.g. 2,1,3)
        #[arg(short, long, value_delimiter = ',', required = true)]
        answers: Vec<usize>,
    },
    /// Show progress across all learning paths
    Status,
    /// Generate practice questions from a lesson
    Generate {
        difficulty: Difficulty,
        module: String,
        /// Lesson number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        lesson: usize,
        /// Maximum number of questions
        #[arg(short, long, default_value_t = 5)]
        max: usize,
    },
    /// Remove progress left behind by older versions
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdant=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if cli.user.is_some() {
        config.user_id = cli.user.clone();
    }

    match cli.command {
        Commands::Modules { difficulty } => {
            let path = open_path(&config, difficulty, cli.offline).await?;
            print_modules(&path);
        }
        Commands::Lesson { difficulty, module, lesson } => {
            let mut path = open_path(&config, difficulty, cli.offline).await?;
            show_lesson(&mut path, &module, lesson)?;
        }
        Commands::Quiz { difficulty, module, quiz } => {
            let mut path = open_path(&config, difficulty, cli.offline).await?;
            start_quiz(&mut path, &module, quiz)?;
            print_quiz(&path);
        }
        Commands::Submit { difficulty, module, quiz, answers } => {
            let mut path = open_path(&config, difficulty, cli.offline).await?;
            start_quiz(&mut path, &module, quiz)?;
            submit(&mut path, &answers)?;
        }
        Commands::Status => {
            for &difficulty in Difficulty::all() {
                let path = open_path(&config, difficulty, cli.offline).await;
                println!("{}", tier_status(difficulty, path));
            }
            let overall = open_store(&config)?.load_overall();
            for (tier, percent) in &overall.tiers {
                println!("overall {}: {}%", tier, percent);
            }
        }
        Commands::Generate { difficulty, module, lesson, max } => {
            let path = open_path(&config, difficulty, cli.offline).await?;
            let found = path.module(&module).with_context(|| format!("No module {:?}", module))?;
            let source = lesson
                .checked_sub(1)
                .and_then(|i| found.lessons.get(i))
                .with_context(|| format!("{} has no lesson {}", found.title, lesson))?;
            let quiz = quizgen::generate_quiz(source, max);
            if quiz.questions.is_empty() {
                println!("Not enough text in \"{}\" to build questions", source.title);
            } else {
                println!("{}", serde_json::to_string_pretty(&quiz)?);
            }
        }
        Commands::Migrate => {
            let files = FileStore::open_default().context("Failed to open progress store")?;
            let report = ProgressStore::new(files, config.user_id.clone()).migrate()?;
            if report.migrated() {
                println!(
                    "Migrated storage from version {} ({} legacy keys removed)",
                    report.from_version,
                    report.removed.len()
                );
            } else {
                println!("Storage is up to date");
            }
        }
    }

    Ok(())
}

/// Open the file-backed progress store for the configured learner
fn open_store(config: &Config) -> Result<ProgressStore<FileStore>> {
    let files = FileStore::open_default().context("Failed to open progress store")?;
    let mut store = ProgressStore::new(files, config.user_id.clone());
    store.migrate().context("Failed to migrate progress store")?;
    Ok(store)
}

/// Load a tier and restore the learner's progress against it
async fn open_path(
    config: &Config,
    difficulty: Difficulty,
    offline: bool,
) -> Result<LearningPath<FileStore>> {
    let loaded = if offline {
        LoadedPath::fallback(difficulty)
    } else {
        let client = ApiClient::new(config.api_base_url.clone(), config.request_timeout())
            .context("Failed to create API client")?;
        ContentLoader::new(client).load_modules(difficulty).await?
    };
    Ok(LearningPath::open(loaded, open_store(config)?))
}

/// One status line per tier; a tier that cannot be opened is reported, not fatal
fn tier_status<S: KeyValueStore>(difficulty: Difficulty, path: Result<LearningPath<S>>) -> String {
    let path = match path {
        Ok(path) => path,
        Err(e) => return format!("{:<13} unavailable: {}", difficulty.to_string(), e),
    };
    let completed = path.modules().iter().filter(|m| path.is_module_completed(&m.id)).count();
    format!(
        "{:<13} {}/{} modules complete{}",
        difficulty.to_string(),
        completed,
        path.modules().len(),
        if path.is_path_completed() { " (path complete)" } else { "" }
    )
}

fn print_modules(path: &LearningPath<FileStore>) {
    println!("{} learning path ({:?} content)", path.difficulty(), path.origin());
    for (i, module) in path.modules().iter().enumerate() {
        let state = if path.is_module_completed(&module.id) {
            "done"
        } else if path.is_module_locked(&module.id) {
            "locked"
        } else {
            "open"
        };
        let lessons = path.progress().module_progress.get(&module.id).copied().unwrap_or(0.0);
        println!(
            "{:>2}. [{:<6}] {} ({}) lessons {:.0}%",
            i + 1,
            state,
            module.title,
            module.id,
            lessons
        );
    }
}

fn show_lesson<S: KeyValueStore>(
    path: &mut LearningPath<S>,
    module: &str,
    lesson: usize,
) -> Result<()> {
    if lesson == 0 {
        bail!("Lesson numbers start at 1");
    }
    if matches!(path.select_module(module)?, View::ReviewChoice { .. }) {
        path.review_lessons()?;
    }
    for _ in 1..lesson {
        path.next_lesson()?;
    }

    let Some(current) = path.current_lesson() else {
        bail!("Lesson {} does not exist", lesson);
    };
    println!("{}\n", current.title);
    for line in wrap(&current.content, WRAP_WIDTH) {
        println!("{}", line);
    }
    if !current.points.is_empty() {
        println!();
        let options = Options::new(WRAP_WIDTH).initial_indent("  * ").subsequent_indent("    ");
        for point in &current.points {
            for line in wrap(point, &options) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Open a module's quiz, picking the `quiz`-th one when there are several
fn start_quiz<S: KeyValueStore>(
    path: &mut LearningPath<S>,
    module: &str,
    quiz: usize,
) -> Result<()> {
    let reviewing = matches!(path.select_module(module)?, View::ReviewChoice { .. });
    if reviewing {
        path.retake_from_review()?;
    } else {
        path.go_to_quiz()?;
    }

    if let View::QuizSelection { .. } = path.view() {
        let module_id = path.current_module().map(|m| m.id.clone()).unwrap_or_default();
        for status in path.quiz_statuses(&module_id)? {
            print_quiz_status(&status);
        }
        let index = quiz.checked_sub(1).context("Quiz numbers start at 1")?;
        path.select_quiz(index)?;
    }
    Ok(())
}

fn print_quiz_status(status: &QuizStatus) {
    let last = status
        .last_score
        .map(|(score, total)| format!(", last score {}/{}", score, total))
        .unwrap_or_default();
    println!(
        "  quiz {}: {} ({} questions, {} attempts{})",
        status.index + 1,
        status.title,
        status.question_count,
        status.attempts,
        last
    );
}

fn print_quiz<S: KeyValueStore>(path: &LearningPath<S>) {
    let Some(quiz) = path.current_quiz() else {
        return;
    };
    println!("{}\n", quiz.title);
    for (n, question) in quiz.questions.iter().enumerate() {
        for line in wrap(&format!("{}. {}", n + 1, question.question), WRAP_WIDTH) {
            println!("{}", line);
        }
        for (i, option) in question.options.iter().enumerate() {
            println!("     {}) {}", i + 1, option);
        }
    }
}

fn submit<S: KeyValueStore>(path: &mut LearningPath<S>, answers: &[usize]) -> Result<()> {
    let question_ids: Vec<u64> = path
        .current_quiz()
        .map(|quiz| quiz.questions.iter().map(|q| q.id).collect())
        .unwrap_or_default();

    if answers.len() != question_ids.len() {
        bail!(
            "This quiz has {} questions but {} answers were given",
            question_ids.len(),
            answers.len()
        );
    }

    for (&question_id, &choice) in question_ids.iter().zip(answers) {
        let option = choice.checked_sub(1).context("Options are numbered from 1")?;
        path.answer(question_id, option)?;
    }

    let outcome = path.submit()?;
    for notice in &outcome.notices {
        println!("{}", notice);
    }
    println!("Score: {}%", outcome.attempt.percentage());
    if path.can_advance() {
        if let Some(next) = path.current_module().and_then(|m| path.next_module(&m.id)) {
            println!("Next up: {} ({})", next.title, next.id);
        }
    }
    Ok(())
}
