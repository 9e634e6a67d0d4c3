//! Thread page renderer.

use maud::{Markup, html};

use super::components::{notification_list, page_shell};
use super::content::RenderContext;
use super::note::note_card;
use crate::notify::Notification;
use crate::thread::{ThreadSnapshot, ThreadState};

/// Render a thread snapshot as a page, the focus note highlighted.
pub fn render_thread(
    snapshot: &ThreadSnapshot,
    notifications: &[&Notification],
    ctx: &RenderContext<'_>,
) -> Markup {
    let body = html! {
        (notification_list(notifications))

        @match snapshot.state {
            ThreadState::Idle => {
                div class="thread-status" { "No thread selected." }
            }
            ThreadState::Loading if snapshot.entries.is_empty() => {
                div class="thread-status" { "Loading thread…" }
            }
            ThreadState::Empty => {
                div class="thread-status" { "This thread is empty." }
            }
            _ => {}
        }

        @for entry in &snapshot.entries {
            (note_card(&entry.note, entry.is_target, ctx))
        }
    };

    page_shell("Thread", body)
}
