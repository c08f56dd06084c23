//! Terminal debug surface for the navigator: `goto N`, `next`, `prev`, `first`,
//! `last` and `info`, typed at a prompt.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use inquire::InquireError;
use regex::Regex;

use crate::config::Config;
use crate::deck::Deck;
use crate::navigator::{
    IgnoreReason, Navigation, NavigationObserver, NavigatorOptions, SlideInfo, SlideNavigator,
};

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?P<verb>goto|go|g|next|n|previous|prev|p|first|home|last|end|info|i|help|\?|quit|exit|q)(?:\s+(?P<arg>-?\d+))?\s*$",
    )
    .expect("console command pattern is valid")
});

const HELP: &str = "goto N   jump to slide N\n\
                    next     next slide\n\
                    prev     previous slide\n\
                    first    first slide\n\
                    last     last slide\n\
                    info     show the current position\n\
                    quit     leave the console";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    GoTo(usize),
    Next,
    Previous,
    First,
    Last,
    Info,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<ConsoleCommand> {
    let caps = COMMAND_RE
        .captures(line)
        .ok_or_else(|| anyhow::anyhow!("Unknown command: {}. Type `help`.", line.trim()))?;
    let verb = caps["verb"].to_lowercase();
    let arg = caps.name("arg").map(|m| m.as_str());

    let command = match (verb.as_str(), arg) {
        ("goto" | "go" | "g", Some(n)) => ConsoleCommand::GoTo(slide_number(n)),
        ("goto" | "go" | "g", None) => anyhow::bail!("`goto` needs a slide number"),
        (_, Some(_)) => anyhow::bail!("`{verb}` takes no argument"),
        ("next" | "n", None) => ConsoleCommand::Next,
        ("previous" | "prev" | "p", None) => ConsoleCommand::Previous,
        ("first" | "home", None) => ConsoleCommand::First,
        ("last" | "end", None) => ConsoleCommand::Last,
        ("info" | "i", None) => ConsoleCommand::Info,
        ("help" | "?", None) => ConsoleCommand::Help,
        _ => ConsoleCommand::Quit,
    };
    Ok(command)
}

/// Negative numbers map to 0 and overflow to `usize::MAX`; both are out of range
/// for any deck and get ignored by the navigator.
fn slide_number(text: &str) -> usize {
    text.parse::<usize>().unwrap_or(if text.starts_with('-') {
        0
    } else {
        usize::MAX
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(SlideInfo),
    Ignored(IgnoreReason),
    Info(SlideInfo),
    Help,
    Quit,
}

/// A navigator whose transitions settle after a real timer.
pub struct Session {
    navigator: SlideNavigator,
    settle: Duration,
}

impl Session {
    pub fn new(navigator: SlideNavigator) -> Self {
        let options = navigator.options();
        let settle = if options.animated {
            options.settle
        } else {
            Duration::ZERO
        };
        Self { navigator, settle }
    }

    pub fn info(&self) -> SlideInfo {
        self.navigator.current_info()
    }

    pub async fn execute(
        &mut self,
        command: ConsoleCommand,
        observer: &mut impl NavigationObserver,
    ) -> Step {
        let navigation = match command {
            ConsoleCommand::GoTo(n) => self.navigator.go_to(n),
            ConsoleCommand::Next => self.navigator.next(),
            ConsoleCommand::Previous => self.navigator.previous(),
            ConsoleCommand::First => self.navigator.first(),
            ConsoleCommand::Last => self.navigator.last(),
            ConsoleCommand::Info => return Step::Info(self.info()),
            ConsoleCommand::Help => return Step::Help,
            ConsoleCommand::Quit => return Step::Quit,
        };

        match navigation {
            Navigation::Started(_) => {
                tokio::time::sleep(self.settle).await;
                match self.navigator.settle(observer) {
                    Some(info) => Step::Moved(info),
                    None => Step::Info(self.info()),
                }
            }
            Navigation::Ignored(reason) => Step::Ignored(reason),
        }
    }
}

pub fn format_info(info: &SlideInfo, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(info)?);
    }
    let mut line = format!("Slide {} / {}", info.position, info.total);
    if info.is_first {
        line.push_str(" (first)");
    }
    if info.is_last {
        line.push_str(" (last)");
    }
    if info.transitioning {
        line.push_str(" [transitioning]");
    }
    Ok(line)
}

/// Prints every settled transition.
struct Printer {
    json: bool,
}

impl NavigationObserver for Printer {
    fn slide_changed(&mut self, info: &SlideInfo) {
        match format_info(info, self.json) {
            Ok(line) => println!("{} {line}", "\u{2192}".green()),
            Err(e) => tracing::warn!("could not format slide info: {e}"),
        }
    }
}

pub fn run(file: Option<PathBuf>, json: bool) -> Result<()> {
    let deck = match &file {
        Some(path) => Deck::load(path)?,
        None => Deck::sample()?,
    };
    let config = Config::load_or_default()?;
    let options = NavigatorOptions {
        animated: config.animated(),
        kind: config.transition().unwrap_or(NavigatorOptions::default().kind),
        settle: config.settle(),
    };
    let navigator = SlideNavigator::starting_at(deck.slide_count(), config.start_slide(), options)
        .ok_or_else(|| anyhow::anyhow!("Deck has no slides"))?;
    let mut session = Session::new(navigator);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let mut printer = Printer { json };

    let title = deck.meta().title.clone().unwrap_or_else(|| "slidectl".to_string());
    println!("{} {}", title.bold(), "(type `help` for commands)".dimmed());
    println!("{}", format_info(&session.info(), json)?);

    loop {
        let line = match inquire::Text::new("slide>").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                continue;
            }
        };

        match runtime.block_on(session.execute(command, &mut printer)) {
            Step::Moved(_) => {}
            Step::Ignored(reason) => {
                let why = match reason {
                    IgnoreReason::OutOfRange => "out of range",
                    IgnoreReason::InTransition => "transition in progress",
                };
                println!("{} ({why})", "ignored".yellow());
            }
            Step::Info(info) => println!("{}", format_info(&info, json)?),
            Step::Help => println!("{HELP}"),
            Step::Quit => break,
        }
    }
    Ok(())
}
