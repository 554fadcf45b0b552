/// Feed derivation for the chat screen.
///
/// Pure functions over store snapshots: date separators, author grouping,
/// reaction badges and display strings. Nothing here touches sync state.

pub mod feed;
pub mod time;

pub use feed::{
    AttachmentView, FeedItem, MessageRow, ReactionBadge, ReplyPreview, build_feed,
    group_reactions, participant_by_id,
};
pub use time::{
    GROUP_WINDOW_MS, format_date, format_time, local_date, should_group_message,
    should_show_date_separator,
};
