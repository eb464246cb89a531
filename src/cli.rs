//! CLI interface for codetutor

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::content::{Catalog, Question};
use crate::progress::{StateStore, StreakChange, Tracker};
use crate::tutor::TutorClient;

#[derive(Parser)]
#[command(name = "codetutor")]
#[command(about = "Interactive programming tutor with lessons, quizzes, and progress tracking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and complete lessons
    Lessons {
        #[command(subcommand)]
        command: LessonCommands,
    },
    /// Take quizzes
    Quiz {
        #[command(subcommand)]
        command: QuizCommands,
    },
    /// Show learning progress (goal, streak, badges, scores)
    Progress,
    /// Manage the learning goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Ask the tutor a free-text question
    Ask {
        /// Question text
        question: String,
        /// Bearer token for the endpoint (overrides config)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Configure the tutor
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the tutoring endpoint URL
        #[arg(long)]
        set_endpoint: Option<String>,
        /// Set the model name sent to the endpoint
        #[arg(long)]
        set_model: Option<String>,
        /// Set the content directory (lessons/ and quizzes/ subdirectories)
        #[arg(long)]
        set_content_dir: Option<String>,
        /// Use the built-in curriculum again
        #[arg(long)]
        clear_content_dir: bool,
    },
}

#[derive(Subcommand)]
enum LessonCommands {
    /// List all lessons with completion marks
    List,
    /// Print a lesson's content
    Show {
        /// Lesson id
        id: String,
    },
    /// Mark a lesson as completed
    Complete {
        /// Lesson id
        id: String,
    },
}

#[derive(Subcommand)]
enum QuizCommands {
    /// List all quizzes with recorded scores
    List,
    /// Take a quiz interactively
    Take {
        /// Quiz id
        id: String,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set a learning goal covering the whole lesson plan
    Set {
        /// What you want to achieve
        #[arg(short, long, default_value = "Complete the Python basics")]
        description: String,
        /// Days to complete it in (1 to 30)
        #[arg(short = 'n', long, default_value = "14")]
        days: i64,
    },
    /// Show schedule status for the current goal
    Status,
}

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Lessons { command } => {
            let mut tracker = open_tracker(&config)?;
            match command {
                LessonCommands::List => list_lessons(&tracker),
                LessonCommands::Show { id } => show_lesson(&tracker, &id)?,
                LessonCommands::Complete { id } => complete_lesson(&mut tracker, &id)?,
            }
        }
        Commands::Quiz { command } => {
            let mut tracker = open_tracker(&config)?;
            match command {
                QuizCommands::List => list_quizzes(&tracker),
                QuizCommands::Take { id } => take_quiz(&mut tracker, &id)?,
            }
        }
        Commands::Progress => {
            let mut tracker = open_tracker(&config)?;
            show_progress(&mut tracker)?;
        }
        Commands::Goal { command } => {
            let mut tracker = open_tracker(&config)?;
            match command {
                GoalCommands::Set { description, days } => {
                    let goal = tracker.set_goal(&description, days)?;
                    println!("Goal set: {} by {}", goal.description, goal.end_date);
                }
                GoalCommands::Status => show_goal_status(&tracker),
            }
        }
        Commands::Ask { question, api_key } => {
            ask_tutor(&config, &question, api_key).await?;
        }
        Commands::Config {
            show,
            set_endpoint,
            set_model,
            set_content_dir,
            clear_content_dir,
        } => {
            let mut acted = false;
            if let Some(endpoint) = set_endpoint {
                config::set_endpoint(&endpoint)?;
                acted = true;
            }
            if let Some(model) = set_model {
                config::set_model(&model)?;
                acted = true;
            }
            if let Some(dir) = set_content_dir {
                config::set_content_dir(Some(&dir))?;
                acted = true;
            }
            if clear_content_dir {
                config::set_content_dir(None)?;
                acted = true;
            }
            if show || !acted {
                config::show_config()?;
            }
        }
    }

    Ok(())
}

fn open_tracker(config: &Config) -> Result<Tracker> {
    let catalog = match &config.content.dir {
        Some(dir) => Catalog::from_dir(dir)?,
        None => Catalog::builtin()?,
    };
    let store = StateStore::open(config::state_path()?)?;
    Tracker::open(store, catalog)
}

fn list_lessons(tracker: &Tracker) {
    println!("Lessons:");
    for lesson in tracker.catalog().lessons() {
        let mark = if tracker.state().has_completed(&lesson.id) {
            "x"
        } else {
            " "
        };
        println!("  [{}] {:<28} {}", mark, lesson.id, lesson.title);
    }
    println!("\nRead one with 'codetutor lessons show <id>'");
}

fn show_lesson(tracker: &Tracker, id: &str) -> Result<()> {
    let lesson = tracker
        .catalog()
        .lesson(id)
        .with_context(|| format!("unknown lesson '{}'", id))?;
    println!("# {}\n", lesson.title);
    for paragraph in &lesson.content {
        println!("{}\n", paragraph);
    }
    println!("Mark it done with 'codetutor lessons complete {}'", id);
    Ok(())
}

fn complete_lesson(tracker: &mut Tracker, id: &str) -> Result<()> {
    let new_badges = tracker.complete_lesson(id)?;
    println!("'{}' marked as completed!", id);
    for badge in new_badges {
        println!("New badge earned: {}", badge);
    }
    Ok(())
}

fn list_quizzes(tracker: &Tracker) {
    println!("Quizzes:");
    for quiz in tracker.catalog().quizzes() {
        let score = tracker
            .state()
            .quiz_scores
            .get(&quiz.id)
            .map(|s| format!("{}/{}", s, quiz.max_score()))
            .unwrap_or_else(|| "-".to_string());
        let lock = if tracker.quiz_unlocked(&quiz.id) {
            " "
        } else {
            "*"
        };
        println!("  {}{:<28} {:<36} {}", lock, quiz.id, quiz.title, score);
    }
    println!("\n(* = complete the matching lesson first)");
}

fn take_quiz(tracker: &mut Tracker, id: &str) -> Result<()> {
    let quiz = tracker
        .catalog()
        .quiz(id)
        .with_context(|| format!("unknown quiz '{}'", id))?
        .clone();

    if !tracker.quiz_unlocked(id) {
        println!("Complete the corresponding lesson first.");
        return Ok(());
    }

    println!("{}\n", quiz.title);
    let mut answers = Vec::with_capacity(quiz.questions.len());
    for question in &quiz.questions {
        answers.push(prompt_answer(question)?);
    }

    let outcome = tracker.submit_quiz(id, &answers)?;
    println!("\nYour score: {}/{}", outcome.score, outcome.total);
    println!("{}", outcome.feedback());
    for badge in outcome.new_badges {
        println!("New badge earned: {}", badge);
    }
    Ok(())
}

fn prompt_answer(question: &Question) -> Result<String> {
    let stdin = std::io::stdin();
    read_answer(question, &mut stdin.lock())
}

fn read_answer(question: &Question, input: &mut impl BufRead) -> Result<String> {
    println!("{}", question.question);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    loop {
        print!("Answer (1-{}): ", question.options.len());
        std::io::stdout().flush()?;
        let mut line = String::new();
        // read_line returns Ok(0) once the input stream is exhausted
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before the quiz was finished");
        }
        if let Ok(choice) = line.trim().parse::<usize>() {
            if (1..=question.options.len()).contains(&choice) {
                println!();
                return Ok(question.options[choice - 1].clone());
            }
        }
        println!("Enter a number between 1 and {}.", question.options.len());
    }
}

fn show_progress(tracker: &mut Tracker) -> Result<()> {
    // Opening the progress view counts as today's interaction
    match tracker.touch()? {
        StreakChange::Extended(count) => println!("Streak extended: {} days in a row!\n", count),
        StreakChange::Reset => println!("Welcome back! Your streak starts fresh today.\n"),
        StreakChange::AlreadyCounted => {}
    }

    println!("Your Learning Progress\n");
    show_goal_status(tracker);

    let state = tracker.state();
    println!("\nCurrent learning streak: {} days", state.streak_count);

    println!("\nBadges earned:");
    if state.badges.is_empty() {
        println!("  (none yet)");
    }
    for badge in &state.badges {
        println!("  - {}", badge);
    }

    println!("\nQuiz scores:");
    if state.quiz_scores.is_empty() {
        println!("  (none yet)");
    }
    for (quiz_id, score) in &state.quiz_scores {
        println!("  {}: {} points", quiz_id, score);
    }

    Ok(())
}

fn show_goal_status(tracker: &Tracker) {
    let now = Local::now().naive_local();
    let Some(goal) = &tracker.state().learning_goal else {
        println!("No learning goal set yet. Try 'codetutor goal set'.");
        return;
    };
    println!("Goal: {}", goal.description);
    println!("Deadline: {}", goal.end_date);

    if let Some(status) = tracker.goal_status(now) {
        let remaining = status.remaining();
        if remaining.is_empty() {
            println!("Lesson plan complete!");
        } else {
            println!("Remaining lessons:");
            for lesson in remaining {
                println!("  - {}", lesson);
            }
        }
        if status.is_behind() {
            println!(
                "You are behind schedule! {} lessons remain, but only {} days left.",
                remaining.len(),
                status.days_left()
            );
        } else {
            println!(
                "You're on track! {} lessons left in {} days.",
                remaining.len(),
                status.days_left()
            );
        }
    }
}

async fn ask_tutor(config: &Config, question: &str, api_key: Option<String>) -> Result<()> {
    if question.trim().is_empty() {
        println!("Please enter a valid question!");
        return Ok(());
    }

    let mut client = TutorClient::from_config(config)?;
    if let Some(api_key) = api_key {
        client = client.with_api_key(api_key);
    }

    let reply = client.ask(question).await;
    println!("{}", reply.text());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_question() -> Question {
        Question {
            question: "Which keyword defines a function?".to_string(),
            options: vec!["func".to_string(), "def".to_string(), "fn".to_string()],
            answer: "def".to_string(),
        }
    }

    #[test]
    fn test_read_answer_returns_chosen_option() {
        let question = sample_question();
        let mut input = Cursor::new("2\n");
        let answer = read_answer(&question, &mut input).unwrap();
        assert_eq!(answer, "def");
    }

    #[test]
    fn test_read_answer_retries_until_a_valid_choice() {
        let question = sample_question();
        let mut input = Cursor::new("hello\n9\n1\n");
        let answer = read_answer(&question, &mut input).unwrap();
        assert_eq!(answer, "func");
    }

    #[test]
    fn test_read_answer_errors_when_input_is_exhausted() {
        let question = sample_question();
        let mut input = Cursor::new("");
        let err = read_answer(&question, &mut input).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_read_answer_errors_after_invalid_lines_then_eof() {
        let question = sample_question();
        let mut input = Cursor::new("nope\n42\n");
        let err = read_answer(&question, &mut input).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
