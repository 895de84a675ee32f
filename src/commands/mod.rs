pub mod attachment;

use tracing::{error, info};

use crate::bot::{self, leaderboard, ResolutionOutcome};
use crate::db::{Ledger, LedgerError};
use crate::ocr::TextExtractor;
use attachment::fetch_attachment;

/// Prefix that marks a chat line as a command.
pub const COMMAND_PREFIX: char = '!';

/// Reply for lines that are not valid commands.
pub const USAGE: &str = "Commands: !add <name>, !remove <name>, !lookFor <name>, \
!add_score (attach a scoreboard image), !leaderboard, !shamerOfTheWeek, !reset";

/// Reply when the score store cannot be reached. The underlying error is
/// logged; it never aborts the bot.
pub const STORE_ERROR_REPLY: &str =
    "The score store is unavailable right now, try again later.";

/// A parsed chat command. Everything after the keyword is the player name,
/// so names may contain spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { name: String },
    Remove { name: String },
    LookFor { name: String },
    AddScore,
    Leaderboard,
    ShamerOfTheWeek,
    Reset,
}

impl Command {
    /// Parse a chat line like `!add Alice`. Returns `None` for lines
    /// without the prefix, unknown keywords (keywords are case-sensitive),
    /// or a missing required name argument.
    pub fn parse(line: &str) -> Option<Command> {
        let body = line.trim().strip_prefix(COMMAND_PREFIX)?;
        let (keyword, rest) = match body.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (body, ""),
        };

        match keyword {
            "add" if !rest.is_empty() => Some(Command::Add {
                name: rest.to_string(),
            }),
            "remove" if !rest.is_empty() => Some(Command::Remove {
                name: rest.to_string(),
            }),
            "lookFor" if !rest.is_empty() => Some(Command::LookFor {
                name: rest.to_string(),
            }),
            "add_score" => Some(Command::AddScore),
            "leaderboard" => Some(Command::Leaderboard),
            "shamerOfTheWeek" => Some(Command::ShamerOfTheWeek),
            "reset" => Some(Command::Reset),
            _ => None,
        }
    }
}

/// Handle one chat line end to end and render the reply text.
///
/// The bot always answers: per-command failures become reply text, and
/// store unavailability gets a distinct reply plus an error log so it is
/// never silently swallowed.
pub async fn handle_chat(
    ledger: &Ledger,
    ocr: &dyn TextExtractor,
    http: &reqwest::Client,
    line: &str,
    attachment: Option<&str>,
) -> String {
    let Some(command) = Command::parse(line) else {
        return USAGE.to_string();
    };
    info!("Handling command {:?}", command);

    match run_command(ledger, ocr, http, command, attachment).await {
        Ok(reply) => reply,
        Err(err) => {
            error!("Command aborted: {err}");
            STORE_ERROR_REPLY.to_string()
        }
    }
}

async fn run_command(
    ledger: &Ledger,
    ocr: &dyn TextExtractor,
    http: &reqwest::Client,
    command: Command,
    attachment: Option<&str>,
) -> Result<String, LedgerError> {
    match command {
        Command::Add { name } => {
            ledger.register_player(&name)?;
            Ok(format!("Player {name} added!"))
        }
        Command::Remove { name } => {
            ledger.remove_player(&name)?;
            Ok(format!("Player {name} removed."))
        }
        Command::LookFor { name } => match ledger.get_player(&name)? {
            Some(player) => Ok(format!(
                "{} has {} points and has been added {} times.",
                player.name, player.score, player.times_added
            )),
            None => Ok("No such player exists in the database.".to_string()),
        },
        Command::Reset => {
            ledger.reset_all()?;
            Ok("Leaderboard Reset!".to_string())
        }
        Command::Leaderboard => {
            let players = ledger.list_players()?;
            if players.is_empty() {
                return Ok("The leaderboard is empty. Add some players first!".to_string());
            }
            let mut reply = String::from("**Leaderboard:**");
            for entry in leaderboard::rank(players) {
                reply.push_str(&format!(
                    "\n{}. {}: {} points (Added {} times)",
                    entry.rank, entry.name, entry.score, entry.times_added
                ));
            }
            Ok(reply)
        }
        Command::ShamerOfTheWeek => {
            let players = ledger.list_players()?;
            match leaderboard::find_most_updated(&players) {
                Some(shamer) => Ok(format!(
                    "🏆 **Shamer of the Week** 🏆\n\
                     Player: **{}**\n\
                     Times Added: **{}**\n\
                     Total Score: **{}**\n\
                     Average Score: **{:.2}**",
                    shamer.name,
                    shamer.times_added,
                    shamer.score,
                    shamer.average_score()
                )),
                None => Ok("No players found in the database!".to_string()),
            }
        }
        Command::AddScore => add_score_from_attachment(ledger, ocr, http, attachment).await,
    }
}

/// The `!add_score` flow: fetch the image, OCR it, reconcile, render one
/// reply line per extracted pair.
async fn add_score_from_attachment(
    ledger: &Ledger,
    ocr: &dyn TextExtractor,
    http: &reqwest::Client,
    attachment: Option<&str>,
) -> Result<String, LedgerError> {
    let Some(reference) = attachment else {
        return Ok("No image attached.".to_string());
    };

    let image = match fetch_attachment(http, reference).await {
        Ok(image) => image,
        Err(err) => {
            error!("Attachment fetch failed: {err:#}");
            return Ok("Could not fetch the attached image.".to_string());
        }
    };

    // OCR failure degrades to empty text, which reconciles to "no data".
    let text = match ocr.extract_text(image.path()).await {
        Ok(text) => text,
        Err(err) => {
            error!("OCR failed on {}: {err:#}", image.path().display());
            String::new()
        }
    };

    let outcomes = bot::reconcile(&text, ledger)?;
    if outcomes.is_empty() {
        return Ok("No valid player names or scores found in the image.".to_string());
    }

    let lines: Vec<String> = outcomes.iter().map(render_outcome).collect();
    Ok(lines.join("\n"))
}

fn render_outcome(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::Resolved {
            name,
            score,
            times_added,
        } => format!("{name} now has {score} points! Times added: {times_added}"),
        ResolutionOutcome::Unresolved { candidate } => {
            format!("Player \"{candidate}\" not found in the database.")
        }
    }
}
