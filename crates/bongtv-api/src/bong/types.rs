//! bong.tv API response payload types.
//!
//! Wire-format structs decoded from the JSON bodies. Fields the provider
//! occasionally omits default to `None`; the domain objects in `broadcast`,
//! `recording` and `channel` turn these into sanitized view values.

use serde::Deserialize;

/// A channel from the channel list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelPayload {
    /// Stable channel id.
    pub id: u64,
    /// Display name (HTML-entity escaped).
    #[serde(default)]
    pub name: Option<String>,
    /// Whether recordings may be scheduled on this channel.
    #[serde(default)]
    pub recordable: bool,
    /// Ordering hint used by the provider's channel list.
    #[serde(default)]
    pub position: i64,
    /// High-definition flag.
    #[serde(default)]
    pub hd: bool,
}

/// Thumbnail reference nested in a broadcast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePayload {
    /// Path fragment below the provider host, may be empty.
    #[serde(default)]
    pub href: Option<String>,
}

/// Series numbering nested in a broadcast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriePayload {
    /// Season number.
    #[serde(default)]
    pub season: Option<u32>,
    /// Episode number.
    #[serde(default)]
    pub episode: Option<u32>,
    /// Total episodes of the season.
    #[serde(default)]
    pub total_episodes: Option<u32>,
}

/// One node of the provider's category tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPayload {
    /// Category name (HTML-entity escaped).
    #[serde(default)]
    pub name: Option<String>,
}

/// A broadcast from list/search responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastPayload {
    /// Broadcast id.
    pub id: u64,
    /// Title (HTML-entity escaped).
    #[serde(default)]
    pub title: Option<String>,
    /// Subtitle, usually the episode title.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Production year.
    #[serde(default)]
    pub production_year: Option<u32>,
    /// Start of the broadcast, epoch milliseconds.
    pub starts_at_ms: i64,
    /// End of the broadcast, epoch milliseconds.
    pub ends_at_ms: i64,
    /// Country of production.
    #[serde(default)]
    pub country: Option<String>,
    /// Thumbnail reference.
    #[serde(default)]
    pub image: Option<ImagePayload>,
    /// Id of the channel airing this broadcast.
    pub channel_id: u64,
    /// Name of the channel airing this broadcast.
    #[serde(default)]
    pub channel_name: Option<String>,
    /// Series numbering, absent for one-off broadcasts.
    #[serde(default)]
    pub serie: Option<SeriePayload>,
    /// Category tree nodes.
    #[serde(default)]
    pub categories: Vec<CategoryPayload>,
    /// Short synopsis.
    #[serde(default)]
    pub short_text: Option<String>,
    /// High-definition flag.
    #[serde(default)]
    pub hd: bool,
}

/// One person attached to a role group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonPayload {
    /// Person name.
    #[serde(default)]
    pub name: Option<String>,
    /// Played character, only set for cast members.
    #[serde(default)]
    pub role: Option<String>,
}

/// A role group (Regisseur, Autor, Musik, Schauspieler) in the detail data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolePayload {
    /// Locale-specific role label.
    #[serde(default)]
    pub name: Option<String>,
    /// People credited under this role.
    #[serde(default)]
    pub people: Vec<PersonPayload>,
}

/// Expensive per-broadcast detail data, fetched separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastDetailsPayload {
    /// Average user rating.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of rating votes.
    #[serde(default)]
    pub votes: Option<i64>,
    /// Full synopsis.
    #[serde(default)]
    pub long_text: Option<String>,
    /// Additional hint text (repeats, related airings).
    #[serde(default)]
    pub hint_text: Option<String>,
    /// Credited people grouped by role.
    #[serde(default)]
    pub roles: Vec<RolePayload>,
}

/// A downloadable file attached to a recording.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilePayload {
    /// Quality label (`nq`, `hq`, `hd` in either case).
    #[serde(default)]
    pub quality: Option<String>,
    /// Playable URL.
    #[serde(default)]
    pub href: Option<String>,
}

/// A recording from the PVR space.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordingPayload {
    /// Recording id.
    pub id: u64,
    /// Lifecycle status (`queued`, `recorded`, others opaque).
    #[serde(default)]
    pub status: Option<String>,
    /// Quality tier bitmask: 1=NQ, 2=HQ, 3=NQ+HQ, 6=HQ+HD, 7=NQ+HQ+HD.
    #[serde(default)]
    pub quality: Option<u8>,
    /// Downloadable files per quality.
    #[serde(default)]
    pub files: Vec<FilePayload>,
    /// The underlying broadcast.
    pub broadcast: BroadcastPayload,
}

/// Subscription data in the login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionPayload {
    /// Used PVR capacity.
    #[serde(default)]
    pub usedcap: Option<u64>,
    /// Maximum PVR capacity.
    #[serde(default)]
    pub maxcap: Option<u64>,
    /// Used capacity in percent, 0..=100.
    #[serde(default)]
    pub used_space_percent: Option<u8>,
}

/// Body of a successful login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPayload {
    /// Subscription data, absent on some API revisions.
    #[serde(default)]
    pub subscription: Option<SubscriptionPayload>,
}
