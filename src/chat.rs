// Terminal consultation: the same workflow as the web UI, over stdin/stdout.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::catalog::PATH_COUNT;
use crate::guidance::{Guidance, GuidanceClient};
use crate::session::{choose, Phase, Session};

/// Run one consultation. Anything not passed in is asked for on `input`.
/// `card` is 1-based, as shown to the seeker.
pub async fn run_consultation<R: BufRead, W: Write>(
    client: &GuidanceClient,
    dilemma: Option<String>,
    card: Option<usize>,
    input: &mut R,
    out: &mut W,
) -> Result<Session> {
    let mut session = Session::new();
    info!(session = %session.id, "Starting terminal consultation");

    writeln!(out, "Cosmic Guidance - ancient wisdom for modern dilemmas")?;
    let mut provided = dilemma;
    while session.phase() == Phase::Intake {
        let text = match provided.take() {
            Some(text) => text,
            None => {
                write!(out, "What weighs on your mind? ")?;
                out.flush()?;
                read_line(input)?
            }
        };
        if !session.submit_dilemma(&text) {
            writeln!(out, "Share your dilemma, challenge, or decision first.")?;
        }
    }

    writeln!(out, "The Universe is Listening...")?;
    session.finish_preparing();

    writeln!(out, "{} paths await. Trust your intuition and select one card.", PATH_COUNT)?;
    let mut chosen = card;
    loop {
        let number = match chosen.take() {
            Some(n) => n,
            None => {
                write!(out, "Card (1-{}): ", PATH_COUNT)?;
                out.flush()?;
                match read_line(input)?.trim().parse::<usize>() {
                    Ok(n) => n,
                    Err(_) => {
                        writeln!(out, "Choose a card by its number.")?;
                        continue;
                    }
                }
            }
        };
        if (1..=PATH_COUNT).contains(&number)
            && choose(&mut session, number - 1, client).await
        {
            break;
        }
        writeln!(out, "Choose a card between 1 and {}.", PATH_COUNT)?;
    }

    if let (Some(path), Some(guidance)) = (session.selected_path(), session.guidance()) {
        writeln!(out)?;
        writeln!(out, "{} {}", path.icon, path.name)?;
        writeln!(out, "\"{}\"", path.subtitle)?;
        writeln!(out)?;
        writeln!(out, "{}", guidance.text)?;
    }
    Ok(session)
}

/// Print guidance for every path at once.
pub fn print_spread<W: Write>(out: &mut W, guidances: &[Guidance]) -> Result<()> {
    for guidance in guidances {
        let Some(path) = crate::catalog::by_id(guidance.path_id) else {
            continue;
        };
        writeln!(out, "{} {} - {}", path.icon, path.name, path.subtitle)?;
        writeln!(out, "    {}", guidance.text.trim())?;
        writeln!(out)?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read from stdin")? == 0 {
        bail!("Input closed before the consultation finished");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
