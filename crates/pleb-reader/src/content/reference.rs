//! Embedded `nostr:` reference decoding and resolution.
//!
//! Note and profile references found by the segmenter carry NIP-19 payloads.
//! They are decoded with the `nostr` crate and resolved against the content
//! source; resolved embeds are cached by URI.

use moka::sync::Cache;
use nostr::nips::nip19::{FromBech32, Nip19};
use pleb_core::{ContentSource, Error, Note, Profile};

/// URI scheme prefix of embedded references.
pub const NOSTR_SCHEME: &str = "nostr:";

/// A decoded embedded reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedReference {
    /// `note1...` or `nevent1...`.
    Note { event_id: String },
    /// `naddr1...`, a replaceable note coordinate.
    Address {
        kind: u16,
        pubkey: String,
        identifier: String,
    },
    /// `npub1...` or `nprofile1...`.
    Profile { pubkey: String },
}

impl EmbeddedReference {
    /// Decode a reference URI. The `nostr:` prefix is optional.
    pub fn parse(uri: &str) -> Result<Self, Error> {
        let bech32 = uri.strip_prefix(NOSTR_SCHEME).unwrap_or(uri);
        let nip19 = Nip19::from_bech32(bech32)
            .map_err(|e| Error::InvalidIdentifier(format!("'{bech32}': {e}")))?;

        match nip19 {
            Nip19::EventId(id) => Ok(Self::Note {
                event_id: id.to_hex(),
            }),
            Nip19::Event(event) => Ok(Self::Note {
                event_id: event.event_id.to_hex(),
            }),
            Nip19::Coordinate(coord) => Ok(Self::Address {
                kind: coord.coordinate.kind.as_u16(),
                pubkey: coord.coordinate.public_key.to_hex(),
                identifier: coord.coordinate.identifier.clone(),
            }),
            Nip19::Pubkey(pk) => Ok(Self::Profile {
                pubkey: pk.to_hex(),
            }),
            Nip19::Profile(profile) => Ok(Self::Profile {
                pubkey: profile.public_key.to_hex(),
            }),
            _ => Err(Error::InvalidIdentifier(
                "secret keys cannot be embedded".to_string(),
            )),
        }
    }
}

/// What an embedded reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    /// A quoted note.
    Note(Box<Note>),
    /// A mentioned profile.
    Profile(Profile),
    /// Undecodable, or not known to the content source.
    Unresolved,
}

/// Resolves embedded references against a content source, caching hits.
#[derive(Clone)]
pub struct EmbedResolver {
    cache: Cache<String, Embed>,
}

impl EmbedResolver {
    /// Create a resolver caching at most `capacity` embeds.
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Resolve a reference URI.
    ///
    /// Misses are not cached, so a note that arrives in the source later is
    /// picked up on the next render.
    pub fn resolve(&self, uri: &str, source: &dyn ContentSource) -> Embed {
        if let Some(embed) = self.cache.get(uri) {
            tracing::debug!(uri, "embed cache hit");
            return embed;
        }

        let reference = match EmbeddedReference::parse(uri) {
            Ok(reference) => reference,
            Err(e) => {
                tracing::debug!(uri, error = %e, "undecodable embedded reference");
                return Embed::Unresolved;
            }
        };

        let embed = match reference {
            EmbeddedReference::Note { event_id } => source
                .note_by_id(&event_id)
                .map(|json| Embed::Note(Box::new(Note::from_json_or_placeholder(&json)))),
            EmbeddedReference::Address {
                kind,
                pubkey,
                identifier,
            } => source
                .find_replaceable(kind, &pubkey, &identifier)
                .map(|json| Embed::Note(Box::new(Note::from_json_or_placeholder(&json)))),
            EmbeddedReference::Profile { pubkey } => source.profile(&pubkey).map(Embed::Profile),
        };

        match embed {
            Some(embed) => {
                self.cache.insert(uri.to_string(), embed.clone());
                embed
            }
            None => Embed::Unresolved,
        }
    }

    /// Number of cached embeds.
    pub fn cached(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Default for EmbedResolver {
    fn default() -> Self {
        Self::new(1000)
    }
}
