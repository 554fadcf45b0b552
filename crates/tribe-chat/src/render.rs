use std::fmt::{Display, Write};

use chrono::TimeZone;

use tribe_feed::{FeedItem, MessageRow, build_feed, format_date, format_time, participant_by_id};
use tribe_store::ChatState;
use tribe_types::{Participant, Timestamp};

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Render the whole chat screen: feed rows followed by a status line.
pub fn render_screen<Tz>(state: &ChatState, now: Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    for item in build_feed(&state.messages, &state.participants, tz) {
        match item {
            FeedItem::DateSeparator { timestamp, .. } => {
                let _ = writeln!(out, "\n---- {} ----", format_date(timestamp, now, tz));
            }
            FeedItem::Message(row) => render_row(&mut out, &row, &state.participants, tz),
        }
    }
    if let Some(status) = status_line(state) {
        let _ = writeln!(out, "\n[{status}]");
    }
    out
}

fn render_row<Tz>(out: &mut String, row: &MessageRow, participants: &[Participant], tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !row.grouped {
        let name = row.author.as_ref().map_or(UNKNOWN_AUTHOR, |p| p.name.as_str());
        let _ = writeln!(out, "{name}  {}", format_time(row.message.sent_at, tz));
    }

    if let Some(reply) = &row.reply {
        let name = participant_by_id(participants, reply.author_uuid)
            .map_or(UNKNOWN_AUTHOR, |p| p.name.as_str());
        let _ = writeln!(out, "  > {name}: {}", reply.text);
    }

    for attachment in &row.attachments {
        match attachment.aspect_ratio {
            Some(ratio) => {
                let _ = writeln!(out, "  [image {:.2}] {}", ratio, attachment.url);
            }
            None => {
                let _ = writeln!(out, "  [image] {}", attachment.url);
            }
        }
    }

    if !row.message.text.is_empty() {
        let edited = if row.edited { " (edited)" } else { "" };
        let _ = writeln!(out, "  {}{edited}", row.message.text);
    }

    if !row.reactions.is_empty() {
        let badges: Vec<String> = row
            .reactions
            .iter()
            .map(|b| format!("{} {}", b.value, b.count))
            .collect();
        let _ = writeln!(out, "  {}", badges.join("  "));
    }
}

fn status_line(state: &ChatState) -> Option<&'static str> {
    if state.busy.sending_message {
        Some("sending...")
    } else if state.busy.loading_messages
        || state.busy.loading_participants
        || state.busy.loading_older
    {
        Some("loading...")
    } else {
        None
    }
}
