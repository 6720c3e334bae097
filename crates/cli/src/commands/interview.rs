use std::io::Write;

use anyhow::Result;
use inner_map_core::InsightRecord;
use inner_map_service::{FlowSnapshot, Journey, ServiceError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::launch_journey;

const HELP: &str = "Type your answer and press Enter. Commands: :back, :skip, :finish, :retry, :quit";

enum Step {
    Continue,
    Done(Box<InsightRecord>),
    Quit,
}

pub(crate) async fn run() -> Result<()> {
    let (mut journey, _) = launch_journey().await?;
    journey.start().await?;
    println!("{HELP}\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(snapshot) = journey.flow().map(|f| f.snapshot()) else {
            return Ok(());
        };
        prompt(&snapshot)?;

        let Some(line) = lines.next_line().await? else {
            tracing::info!("input closed, leaving interview unfinished");
            return Ok(());
        };
        match step(&mut journey, &snapshot, line.trim()).await {
            Ok(Step::Continue) => {},
            Ok(Step::Done(record)) => {
                print_record(&record);
                return Ok(());
            },
            Ok(Step::Quit) => return Ok(()),
            Err(ServiceError::Flow(e)) => println!("  ({e})"),
            Err(e) => {
                if let Some(message) = journey.error() {
                    println!("\n{message}");
                }
                return Err(e.into());
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Quit,
    Retry,
    Skip,
    Back,
    Answer(&'a str),
    /// Finish with the given answer, or the saved draft when `None`.
    Finish(Option<&'a str>),
}

/// Map a line of input to an action. On the last question an answer or a
/// skip finishes the interview.
fn parse_action(input: &str, must_finish: bool) -> Action<'_> {
    match input {
        ":quit" => Action::Quit,
        ":retry" => Action::Retry,
        ":back" => Action::Back,
        ":finish" => Action::Finish(None),
        ":skip" if must_finish => Action::Finish(Some("")),
        ":skip" => Action::Skip,
        answer if must_finish => Action::Finish(Some(answer)),
        answer => Action::Answer(answer),
    }
}

async fn step(
    journey: &mut Journey,
    snapshot: &FlowSnapshot,
    input: &str,
) -> Result<Step, ServiceError> {
    match parse_action(input, snapshot.must_finish) {
        Action::Quit => return Ok(Step::Quit),
        Action::Retry => journey.retry().await?,
        Action::Skip => journey.skip().await?,
        Action::Back => journey.previous(None)?,
        Action::Answer(answer) => journey.answer(answer).await?,
        Action::Finish(answer) => {
            println!("\nReflecting on your answers...");
            return Ok(Step::Done(Box::new(journey.finish(answer).await?)));
        },
    }
    Ok(Step::Continue)
}

fn prompt(snapshot: &FlowSnapshot) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match (&snapshot.question, &snapshot.error) {
        (_, Some(error)) => writeln!(out, "{error} (:retry)")?,
        (Some(question), None) => {
            writeln!(out, "[{}/{}] {question}", snapshot.question_number, snapshot.max_questions)?;
            if !snapshot.draft.is_empty() {
                writeln!(out, "  previous answer: {}", snapshot.draft)?;
            }
            if snapshot.must_finish {
                writeln!(out, "  last question: your answer finishes the interview")?;
            } else if snapshot.can_finish {
                writeln!(out, "  (:finish whenever you are ready)")?;
            }
        },
        (None, None) => writeln!(out, "Waiting for the next question...")?,
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn print_record(record: &InsightRecord) {
    println!("\n{}\n", record.reflection);
    println!("{}\n", record.poem);
    for pattern in &record.patterns {
        println!("[{}] {}: {}", pattern.icon_kind, pattern.title, pattern.description);
    }
    println!("\n{}: {}", record.symbolic_map.title, record.symbolic_map.description);
    if record.is_milestone {
        println!("\nMilestone: {}", record.milestone_reason.as_deref().unwrap_or_default());
    }
    println!("\nSaved as journal entry {} (`inner-map show {}`)", record.id(), record.id());
}
