use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use storage::{prepare_database_url, ScoreRepository, ScoreStorage, StoredSession};

#[derive(Parser, Debug)]
#[command(name = "color-match-tools", about = "Inspect and maintain Color Match scores")]
struct Cli {
    /// Defaults to the url from color_match.toml or the environment.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored best score.
    Best,
    /// List recent sessions, newest first.
    History {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Delete the best score and all session history.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

fn format_session(session: &StoredSession) -> String {
    let best = if session.is_new_best { " (new best)" } else { "" };
    format!(
        "#{} {} score={}{} best={} reason={} duration={}s",
        session.session_id,
        session.played_at.format("%Y-%m-%d %H:%M:%S"),
        session.final_score,
        best,
        session.best_score,
        session.reason.as_str(),
        session.duration_secs,
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .unwrap_or_else(|| game_core::load_settings().database_url);
    let storage = ScoreStorage::new(&prepare_database_url(&database_url)?).await?;

    match cli.command {
        Command::Best => {
            let best = storage.load_best_score().await?;
            println!("best_score={best}");
        }
        Command::History { limit } => {
            let sessions = storage.recent_sessions(limit).await?;
            if sessions.is_empty() {
                println!("no sessions recorded");
            }
            for session in &sessions {
                println!("{}", format_session(session));
            }
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to reset scores without --yes");
            }
            storage.reset().await?;
            println!("scores reset");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shared::protocol::EndReason;
    use storage::StoredSession;

    use super::format_session;

    #[test]
    fn formats_session_line() {
        let session = StoredSession {
            session_id: 4,
            final_score: 12,
            best_score: 12,
            is_new_best: true,
            reason: EndReason::TimeUp,
            duration_secs: 30,
            played_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single().expect("timestamp"),
        };

        assert_eq!(
            format_session(&session),
            "#4 2024-05-01 09:30:00 score=12 (new best) best=12 reason=time_up duration=30s"
        );
    }
}
