//! Shared HTML components used across all reader pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{Markup, PreEscaped, html};
use nostr::nips::nip19::Nip19Event;
use nostr::{EventId, PublicKey, ToBech32};
use pleb_core::{KIND_LONG_FORM, KIND_REPOST, KIND_TEXT_NOTE, Note, Profile};

use crate::notify::Notification;

/// Inline CSS for all reader pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#9900CC;--surface:#fff;--border:rgba(153,0,204,.15);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:680px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}
svg.icon{width:18px;height:18px;fill:currentColor;vertical-align:-3px;flex-shrink:0}

.card{padding:1.25rem;border:1px solid var(--border);border-radius:10px;margin-bottom:.75rem;background:var(--surface)}
.card.target{border-color:var(--accent);box-shadow:0 0 0 1px var(--accent)}

.author{display:flex;align-items:center;gap:.75rem;margin-bottom:.85rem}
.author-pic{width:44px;height:44px;border-radius:50%;background:var(--accent);flex-shrink:0;display:flex;align-items:center;justify-content:center;color:#fff;font-weight:700;text-transform:uppercase;overflow:hidden;position:relative}
.author-pic img{position:absolute;inset:0;width:100%;height:100%;object-fit:cover}
.author-name{font-weight:600;color:var(--fg)}
.author-nip05,.author-npub{font-family:var(--mono);color:var(--fg3);font-size:.78rem}

.content{word-break:break-word;font-size:1.02rem;line-height:1.7}
.segment-image{display:block;border-radius:8px;margin:.6rem 0}
.image-loading,.image-error{display:flex;align-items:center;justify-content:center;min-height:120px;border-radius:8px;margin:.6rem 0;background:var(--border);color:var(--fg3);font-size:.85rem;gap:.4rem}
.mention{font-weight:500}

.quote-card{border:1px solid var(--border);border-radius:8px;padding:.75rem 1rem;margin:.6rem 0;display:block;color:var(--fg)}
.quote-card:hover{border-color:var(--accent);text-decoration:none}
.quote-card-author{display:flex;gap:.5rem;margin-bottom:.3rem;font-size:.85rem}
.quote-card-name{font-weight:600}
.quote-card-time{color:var(--fg3);margin-left:auto}
.quote-card-content{font-size:.9rem;color:var(--fg2);white-space:pre-wrap}

.engagement{display:flex;justify-content:space-between;gap:1rem;margin-top:1rem;padding-top:.75rem;border-top:1px solid var(--border);font-size:.85rem;color:var(--fg3)}
.engagement-left{display:flex;gap:1.25rem}
.engagement-left span{display:flex;align-items:center;gap:.35rem}

.kind-badge{display:inline-block;color:var(--fg3);font-size:.75rem;padding:.15rem .55rem;border-radius:100px;text-transform:uppercase;margin-bottom:.6rem;border:1px solid var(--border)}
.reply-context{font-size:.85rem;color:var(--fg3);margin-bottom:.5rem}

.article-title{font-size:1.6rem;font-weight:700;line-height:1.3;margin-bottom:.5rem}
.article-summary{color:var(--fg2);margin:.5rem 0 1rem}
.article-image{width:100%;max-height:280px;object-fit:cover;border-radius:8px;margin-bottom:1rem}
.article-date{font-size:.85rem;color:var(--fg3);margin-bottom:1rem}

.thread-status{text-align:center;color:var(--fg3);padding:2rem 0}
.notifications{position:sticky;top:0;display:flex;flex-direction:column;gap:.4rem;margin-bottom:1rem}
.notification{padding:.5rem .85rem;border-radius:6px;font-size:.9rem;color:#fff}
.notification.success{background:#16a34a}
.notification.error{background:#dc2626}

.footer{text-align:center;margin-top:1rem;font-size:.8rem;color:var(--fg3)}

@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#d946ef;--surface:#111118;--border:rgba(191,0,255,.2)}
}
"#;

/// Render the full HTML page shell with `<head>` and body content.
pub fn page_shell(title: &str, body_content: Markup) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" { "Rendered by pleb-reader" }
            }
        }
    }
}

/// Render an author header with picture, name, NIP-05, and truncated npub.
pub fn author_header(author: &Profile, base_url: &str) -> Markup {
    let name = author.display_name();
    let npub = npub_for(&author.pubkey);
    let initial = name
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();

    html! {
        div class="author" {
            div class="author-pic" {
                (initial.as_str())
                @if let Some(pic_url) = author.picture.as_deref() {
                    @if is_safe_url(pic_url) {
                        img src=(pic_url) alt=(name) loading="lazy" onerror="this.style.display='none'";
                    }
                }
            }
            div {
                a href={(base_url) "/" (npub)} class="author-name" { (name) }
                @if let Some(nip05) = author.nip05.as_deref() {
                    div class="author-nip05" { (nip05) }
                }
                div class="author-npub" title=(npub) { (truncate_key(&npub)) }
            }
        }
    }
}

// -- Phosphor icon SVGs (fill variants) --

const ICON_HEART: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M240,94c0,70-103.79,126.66-108.21,129a8,8,0,0,1-7.58,0C119.79,220.66,16,164,16,94A62.07,62.07,0,0,1,78,32c20.65,0,38.73,8.88,50,23.89C139.27,40.88,157.35,32,178,32A62.07,62.07,0,0,1,240,94Z"/></svg>"#;

const ICON_CHAT: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M232,56V184a16,16,0,0,1-16,16H155.57l-13.68,23.94a16,16,0,0,1-27.78,0L100.43,200H40a16,16,0,0,1-16-16V56A16,16,0,0,1,40,40H216A16,16,0,0,1,232,56Z"/></svg>"#;

const ICON_REPOST: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M213.66,66.34l-32-32a8,8,0,0,0-11.32,11.32L188.69,64H48A16,16,0,0,0,32,80v40a8,8,0,0,0,16,0V80H188.69l-18.35,18.34a8,8,0,0,0,11.32,11.32l32-32A8,8,0,0,0,213.66,66.34Zm-40,120H67.31l18.35-18.34a8,8,0,0,0-11.32-11.32l-32,32a8,8,0,0,0,0,11.32l32,32a8,8,0,0,0,11.32-11.32L67.31,192H208a16,16,0,0,0,16-16V136a8,8,0,0,0-16,0v40Z"/></svg>"#;

const ICON_LIGHTNING: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M213.85,125.46l-112,120a8,8,0,0,1-13.69-7l14.66-73.33L57.45,143.37a8,8,0,0,1-5.3-11.83l112-120a8,8,0,0,1,13.69,7L163.18,91.87l45.37,21.76A8,8,0,0,1,213.85,125.46Z"/></svg>"#;

/// Render engagement counts + timestamp on one line.
pub fn engagement_bar(note: &Note, timestamp: i64) -> Markup {
    html! {
        div class="engagement" {
            div class="engagement-left" {
                span title="Likes" {
                    (PreEscaped(ICON_HEART)) " " (format_count(u64::from(note.likes)))
                }
                span title="Replies" {
                    (PreEscaped(ICON_CHAT)) " " (format_count(u64::from(note.replies)))
                }
                span title="Reposts" {
                    (PreEscaped(ICON_REPOST)) " " (format_count(u64::from(note.reposts)))
                }
                span title=(format!("{} zaps", note.zap_count)) {
                    (PreEscaped(ICON_LIGHTNING)) " " (format_sats(note.zap_amount))
                }
            }
            @if let Some((display, iso)) = format_timestamp(timestamp) {
                time class="engagement-time" datetime=(iso) { (display) }
            }
        }
    }
}

/// Render a kind badge for non-text kinds.
pub fn kind_badge(kind: u16) -> Markup {
    let label = match kind {
        KIND_TEXT_NOTE => "Note",
        KIND_REPOST => "Repost",
        KIND_LONG_FORM => "Long-form Article",
        _ => "",
    };

    html! {
        @if label.is_empty() {
            span class="kind-badge" { "Kind " (kind) }
        } @else {
            span class="kind-badge" { (label) }
        }
    }
}

/// Render the currently visible action notifications.
pub fn notification_list(notifications: &[&Notification]) -> Markup {
    html! {
        @if !notifications.is_empty() {
            div class="notifications" role="status" {
                @for notification in notifications {
                    div class={"notification " (notification.level.as_str())} {
                        (notification.message)
                    }
                }
            }
        }
    }
}

/// Format a timestamp as "Mon DD, YYYY HH:MM UTC" plus its ISO form.
/// Returns None if the timestamp is 0 (missing) or out of range.
pub fn format_timestamp(timestamp: i64) -> Option<(String, String)> {
    if timestamp == 0 {
        return None;
    }

    let ts = chrono::DateTime::from_timestamp(timestamp, 0)?;
    let display = ts.format("%b %d, %Y %H:%M UTC").to_string();
    let iso = ts.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    Some((display, iso))
}

/// Format sats as a human-readable string.
pub fn format_sats(sats: u64) -> String {
    if sats >= 1_000_000 {
        format!("{:.1}M sats", sats as f64 / 1_000_000.0)
    } else if sats >= 1_000 {
        format!("{:.1}K sats", sats as f64 / 1_000.0)
    } else {
        format!("{sats} sats")
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Format a large number with K/M suffixes for display.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Truncate an npub/hex key for display (first 12 + last 4 chars).
pub fn truncate_key(key: &str) -> String {
    if key.len() <= 16 || !key.is_ascii() {
        return key.to_string();
    }
    format!("{}...{}", &key[..12], &key[key.len() - 4..])
}

/// npub for a hex pubkey, or the input unchanged if it is not one.
pub fn npub_for(pubkey_hex: &str) -> String {
    PublicKey::from_hex(pubkey_hex)
        .ok()
        .and_then(|pk| pk.to_bech32().ok())
        .unwrap_or_else(|| pubkey_hex.to_string())
}

/// Link target for a note: `nevent` for hex event ids, the raw id otherwise.
pub fn note_link(base_url: &str, note_id: &str) -> String {
    let target = EventId::from_hex(note_id)
        .ok()
        .and_then(|id| Nip19Event::new(id).to_bech32().ok())
        .unwrap_or_else(|| note_id.to_string());
    format!("{base_url}/{target}")
}
