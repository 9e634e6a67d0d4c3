//! Reader session over an in-memory note store.
//!
//! Ties the thread materializer, the action notification queue, and the
//! embed cache to a [`MemorySource`], and renders pages from the result.

use std::collections::HashMap;

use chrono::Utc;
use maud::Markup;
use pleb_core::{ContentSource, MemorySource, Note, Result};

use crate::article::find_article;
use crate::config::Config;
use crate::content::EmbedResolver;
use crate::notify::NotificationQueue;
use crate::render::{self, ImageStatus, RenderContext};
use crate::thread::{ThreadMaterializer, ThreadSnapshot};

/// A reader session.
pub struct Reader {
    source: MemorySource,
    thread: ThreadMaterializer,
    notifications: NotificationQueue,
    embeds: EmbedResolver,
    images: HashMap<String, ImageStatus>,
    base_url: String,
    auto_load_images: bool,
}

impl Reader {
    pub fn new(source: MemorySource, config: &Config) -> Self {
        Self {
            source,
            thread: ThreadMaterializer::new(),
            notifications: NotificationQueue::default(),
            embeds: EmbedResolver::new(config.embed_cache_capacity),
            images: HashMap::new(),
            base_url: config.base_url.clone(),
            auto_load_images: config.auto_load_images,
        }
    }

    /// Focus the thread view on `focus_id` and apply whatever loads complete.
    pub fn open_thread(&mut self, focus_id: &str) {
        self.thread.set_focus(focus_id, Some(&mut self.source));
        self.complete_loads();
    }

    /// Apply every completed thread load, in completion order.
    pub fn complete_loads(&mut self) {
        for loaded in self.source.complete_all_loads() {
            self.thread.on_loaded(loaded, &self.source);
        }
    }

    /// Reply to a note, then surface the result.
    pub fn reply(&mut self, note_id: &str, text: &str) {
        self.source.reply(note_id, text);
        self.process_actions();
    }

    /// Like a note, then surface the result.
    pub fn like(&mut self, note_id: &str) {
        self.source.like(note_id);
        self.process_actions();
    }

    /// Zap a note, then surface the result.
    pub fn zap(&mut self, note_id: &str, amount_sats: u64, comment: &str) {
        self.source.zap(note_id, amount_sats, comment);
        self.process_actions();
    }

    /// Turn pending action results into notifications, reloading the thread
    /// where needed.
    pub fn process_actions(&mut self) {
        let now = Utc::now();
        for event in self.source.take_action_events() {
            self.notifications.push(&event, now);
            self.thread.on_action(&event, &mut self.source);
        }
        self.complete_loads();
    }

    /// Record an image load status reported by the image loader.
    pub fn set_image_status(&mut self, url: &str, status: ImageStatus) {
        self.images.insert(url.to_string(), status);
    }

    pub fn thread(&self) -> ThreadSnapshot {
        self.thread.snapshot()
    }

    pub fn source(&self) -> &MemorySource {
        &self.source
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Notes of the current feed, in feed order.
    pub fn feed(&self) -> Vec<Note> {
        (0..self.source.feed_entry_count())
            .filter_map(|index| self.source.feed_entry(index))
            .map(|json| Note::from_json_or_placeholder(&json))
            .collect()
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            base_url: &self.base_url,
            auto_load_images: self.auto_load_images,
            images: &self.images,
            source: &self.source,
            embeds: &self.embeds,
        }
    }

    pub fn render_thread(&self) -> Markup {
        let active = self.notifications.active(Utc::now());
        render::render_thread(&self.thread.snapshot(), &active, &self.context())
    }

    pub fn render_feed(&self) -> Markup {
        render::render_feed(&self.feed(), &self.context())
    }

    /// Render the note `id` as an article.
    ///
    /// # Errors
    ///
    /// Returns [`pleb_core::Error::NotFound`] if the store has no such note.
    pub fn render_article(&self, id: &str) -> Result<Markup> {
        let article = find_article(&self.source, id)?;
        Ok(render::render_article(&article, &self.context()))
    }
}
