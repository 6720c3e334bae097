use anyhow::Result;

use crate::open_journal;

pub(crate) async fn run_journal(limit: usize) -> Result<()> {
    let journal = open_journal().await?;
    let mut records = journal.list_sessions().await;
    records.truncate(limit);
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

pub(crate) async fn run_evolution() -> Result<()> {
    let journal = open_journal().await?;
    println!("{}", serde_json::to_string_pretty(&journal.evolution().await)?);
    Ok(())
}

pub(crate) async fn run_show(created_at: i64) -> Result<()> {
    let journal = open_journal().await?;
    match journal.get_session(created_at).await {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => anyhow::bail!("journal entry not found: {created_at}"),
    }
    Ok(())
}
