//! Terminal front end for the interview chatbot.
//!
//! `init` scaffolds a project directory, `validate` checks its config and
//! question catalogue, `chat` runs one interview over stdin/stdout and
//! `results` lists the interviews recorded so far.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use interview::core::session::Session;
use interview::core::types::OutputEvent;
use interview::engine::Interviewer;
use interview::io::catalogue::load_catalogue;
use interview::io::config::{CONFIG_FILE, InterviewConfig, load_config};
use interview::io::init::{InitOptions, ProjectPaths, init_project};
use interview::io::results_store::load_records;
use interview::logging;

#[derive(Parser)]
#[command(name = "interview", version, about = "Multi-step interview chatbot")]
struct Cli {
    /// Project directory holding `interview.toml`.
    #[arg(short = 'C', long, global = true, default_value = ".")]
    root: PathBuf,

    /// Debug-level diagnostics on stderr (ignored when `RUST_LOG` is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write `interview.toml` and a sample `questions.toml`.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check the config and question catalogue.
    Validate,
    /// Run an interview in the terminal. `/upload <path>` sends a resume,
    /// `/quit` leaves.
    Chat,
    /// List recorded interviews.
    Results,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(if cli.verbose {
        logging::VERBOSE_FILTER
    } else {
        logging::DEFAULT_FILTER
    });

    match cli.command {
        Command::Init { force } => cmd_init(&cli.root, force),
        Command::Validate => cmd_validate(&cli.root),
        Command::Chat => cmd_chat(&cli.root),
        Command::Results => cmd_results(&cli.root),
    }
}

fn project(root: &Path) -> Result<(InterviewConfig, ProjectPaths)> {
    let cfg = load_config(&root.join(CONFIG_FILE))?;
    let paths = ProjectPaths::new(root, &cfg);
    Ok((cfg, paths))
}

fn cmd_init(root: &Path, force: bool) -> Result<()> {
    let paths = init_project(root, &InitOptions { force })?;
    println!("wrote {}", paths.config_path.display());
    println!("wrote {}", paths.catalogue_path.display());
    Ok(())
}

fn cmd_validate(root: &Path) -> Result<()> {
    let (_, paths) = project(root)?;
    let catalogue = load_catalogue(&paths.catalogue_path)?;
    let unknown = catalogue.unknown_keys();
    if !unknown.is_empty() {
        bail!(
            "unknown catalogue keys in {}:\n- {}",
            paths.catalogue_path.display(),
            unknown.join("\n- ")
        );
    }
    println!(
        "ok: {} general questions, {} occupation lists, {} role lists",
        catalogue.general_questions().len(),
        catalogue.occupation.len(),
        catalogue.role.len()
    );
    Ok(())
}

fn cmd_chat(root: &Path) -> Result<()> {
    let (cfg, _) = project(root)?;
    let interviewer = Interviewer::from_config(root, &cfg);
    let mut session = interviewer.start_session();
    let mut out = io::stdout().lock();

    let event = interviewer.handle_message(&mut session, "");
    print_event(&mut out, &event)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("read stdin")?;
        let event = match parse_line(line.trim()) {
            ChatLine::Quit => break,
            ChatLine::Upload(path) => match upload(&interviewer, &mut session, path) {
                Ok(stored) => {
                    writeln!(out, "bot: Resume uploaded successfully ({stored})")?;
                    interviewer.handle_message(&mut session, "")
                }
                Err(err) => {
                    writeln!(out, "bot: {err:#}")?;
                    continue;
                }
            },
            ChatLine::Answer(input) => interviewer.handle_message(&mut session, input),
        };
        print_event(&mut out, &event)?;
        if session.is_complete() && event.is_farewell() {
            break;
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ChatLine<'a> {
    Quit,
    Upload(&'a str),
    Answer(&'a str),
}

/// Chat commands are whole words; `/uploads` is an ordinary answer.
fn parse_line(input: &str) -> ChatLine<'_> {
    if input == "/quit" {
        return ChatLine::Quit;
    }
    match input.strip_prefix("/upload") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            ChatLine::Upload(rest.trim())
        }
        _ => ChatLine::Answer(input),
    }
}

fn upload(interviewer: &Interviewer, session: &mut Session, path: &str) -> Result<String> {
    if path.is_empty() {
        bail!("usage: /upload <path>");
    }
    let path = Path::new(path);
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(interviewer.accept_upload(session, &name, &bytes)?)
}

fn print_event(out: &mut impl Write, event: &OutputEvent) -> Result<()> {
    if !event.bot_text.is_empty() {
        writeln!(out, "bot: {}", event.bot_text)?;
    }
    if !event.next_prompt.is_empty() {
        writeln!(out, "     {}", event.next_prompt)?;
    }
    for (n, option) in event.choice_options.iter().enumerate() {
        writeln!(out, "     {}) {option}", n + 1)?;
    }
    if event.is_file_upload_prompt {
        writeln!(out, "     (send /upload <path>)")?;
    }
    out.flush().context("flush stdout")
}

fn cmd_results(root: &Path) -> Result<()> {
    let (_, paths) = project(root)?;
    let records = load_records(&paths.results_path)?;
    if records.is_empty() {
        println!("no interviews recorded");
        return Ok(());
    }
    for record in records {
        println!(
            "{}\t{}\t{} answers\t{}",
            record.id,
            record.completed_at.to_rfc3339(),
            record.answers.len(),
            record.file_reference.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview::core::types::FAULT_TEXT;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["interview", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["interview", "chat", "-C", "/tmp/project", "--verbose"]);
        assert!(matches!(cli.command, Command::Chat));
        assert!(cli.verbose);
        assert_eq!(cli.root, PathBuf::from("/tmp/project"));
    }

    #[test]
    fn chat_commands_match_whole_words() {
        assert_eq!(parse_line("/quit"), ChatLine::Quit);
        assert_eq!(parse_line("/upload cv.pdf"), ChatLine::Upload("cv.pdf"));
        assert_eq!(parse_line("/upload"), ChatLine::Upload(""));
        assert_eq!(parse_line("/uploadfoo"), ChatLine::Answer("/uploadfoo"));
        assert_eq!(parse_line("/quitting"), ChatLine::Answer("/quitting"));
        assert_eq!(parse_line("Alice"), ChatLine::Answer("Alice"));
    }

    #[test]
    fn choice_events_list_numbered_options() {
        let event = OutputEvent::choice(
            "Thanks.",
            "Select your preferred job mode:",
            vec!["Remote".to_string(), "Onsite".to_string()],
        );
        let mut buf = Vec::new();
        print_event(&mut buf, &event).expect("print");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("bot: Thanks."));
        assert!(text.contains("1) Remote"));
        assert!(text.contains("2) Onsite"));
    }

    #[test]
    fn fault_event_prints_retry() {
        let mut buf = Vec::new();
        print_event(&mut buf, &OutputEvent::fault()).expect("print");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains(FAULT_TEXT));
    }
}
