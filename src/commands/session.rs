use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::models::{LogEntry, VideoReference};
use crate::services::recorder::{AppendOutcome, FitnessRecorder, VideoOutcome};

const QUIT: &str = "/quit";

pub fn format_entries(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "  (no entries yet)\n".to_string();
    }
    entries
        .iter()
        .map(|e| format!("  {:<24} {:>5} minutes   {}\n", e.name, e.minutes, e.local_date()))
        .collect()
}

pub fn format_video(video: Option<&VideoReference>) -> String {
    match video {
        Some(reference) => format!("Video: {}\n", reference),
        None => "Video: none yet\n".to_string(),
    }
}

pub fn format_outcome(outcome: &AppendOutcome) -> String {
    let mut text = format!(
        "Added {} minutes of {} to your fitness record!\n",
        outcome.entry.minutes, outcome.entry.name
    );
    text.push_str(&format!("Recent ({} total):\n", outcome.total));
    text.push_str(&format_entries(&outcome.recent));
    match &outcome.video {
        VideoOutcome::Found(reference) => text.push_str(&format_video(Some(reference))),
        VideoOutcome::Failed(e) => text.push_str(&format!("Video unavailable: {}\n", e)),
        VideoOutcome::Skipped => {}
    }
    text
}

async fn prompt<R, W>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>, String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}: ", label).map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    let read = input.read_line(&mut line).await.map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.trim() == QUIT {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Interactive form: name, minutes, submit, repeat until EOF or `/quit`.
///
/// Returns the number of entries recorded during the session.
pub async fn run_session<R, W>(
    recorder: &FitnessRecorder,
    mut input: R,
    out: &mut W,
) -> Result<usize, String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    recorder.start().await.map_err(|e| e.to_string())?;

    let view = recorder.view().await;
    let mut header = format!("Fitness Recorder ({} entries, type {} to leave)\n", view.total, QUIT);
    header.push_str(&format_entries(&view.recent));
    header.push_str(&format_video(view.video.as_ref()));
    out.write_all(header.as_bytes()).map_err(|e| e.to_string())?;

    let mut recorded = 0;
    loop {
        let Some(name) = prompt(&mut input, out, "Fitness Name").await? else {
            break;
        };
        recorder.set_name(name).await;

        let Some(minutes) = prompt(&mut input, out, "Minutes").await? else {
            break;
        };
        recorder.set_minutes(minutes).await;

        let text = match recorder.submit().await {
            Ok(outcome) => {
                recorded += 1;
                format_outcome(&outcome)
            }
            Err(e) => format!("Error: {}\n", e),
        };
        out.write_all(text.as_bytes()).map_err(|e| e.to_string())?;
    }

    recorder.shutdown();
    Ok(recorded)
}
