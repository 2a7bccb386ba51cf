//! Broadcast view object and its lazily fetched detail data.

use std::collections::BTreeSet;

use chrono::{DateTime, Local, LocalResult, TimeZone};
use regex::Regex;
use tokio::sync::OnceCell;

use super::api::LocalBongApi;
use super::channel::channel_logo_url;
use super::error::{Error, Result};
use super::sanitize::sanitize;
use super::types::{BroadcastDetailsPayload, BroadcastPayload, PersonPayload};

/// Role labels used by the provider's detail payload.
const ROLE_DIRECTOR: &str = "Regisseur";
const ROLE_AUTHOR: &str = "Autor";
const ROLE_COMPOSER: &str = "Musik";
const ROLE_ACTOR: &str = "Schauspieler";

/// A cast member together with the played character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Actor {
    /// Person name.
    pub name: String,
    /// Played character, may be empty.
    pub role: String,
}

/// Expensive per-broadcast data, fetched on first access.
#[derive(Debug, Clone, Default)]
pub struct BroadcastDetails {
    /// Average user rating.
    pub rating: Option<f64>,
    /// Number of rating votes.
    pub votes: Option<i64>,
    /// Full synopsis.
    pub plot: String,
    /// Additional hint text.
    pub hint: String,
    /// Directors, sorted and deduplicated.
    pub directors: Vec<String>,
    /// Authors, sorted and deduplicated.
    pub authors: Vec<String>,
    /// Composers, sorted and deduplicated.
    pub composers: Vec<String>,
    /// Cast, sorted and deduplicated by (name, role).
    pub actors: Vec<Actor>,
}

/// A single scheduled program airing on a channel.
///
/// Constructed from one entry of a broadcast list or search response.
/// Everything except [`Self::details`] is available without further
/// network traffic.
#[derive(Debug)]
pub struct Broadcast {
    /// Broadcast id.
    pub id: u64,
    /// Sanitized title.
    pub title: String,
    /// Sanitized subtitle, usually the episode title.
    pub subtitle: String,
    /// Production year.
    pub production_year: Option<u32>,
    /// Start in local calendar time.
    pub starts_at: DateTime<Local>,
    /// End in local calendar time.
    pub ends_at: DateTime<Local>,
    /// Duration in whole minutes.
    pub duration: i64,
    /// Sanitized country of production.
    pub country: String,
    /// Absolute thumbnail URL, empty when the provider has no image.
    pub thumb_url: String,
    /// Id of the channel airing this broadcast.
    pub channel_id: u64,
    /// Sanitized channel name.
    pub channel_name: String,
    /// Channel logo URL, derived from the channel id.
    pub channel_logo_url: String,
    /// Season number, 0 when absent.
    pub season: u32,
    /// Episode number, 0 when absent.
    pub episode: u32,
    /// Total episodes of the season, 0 when absent.
    pub total_episodes: u32,
    /// Flattened, deduplicated category names.
    pub categories: BTreeSet<String>,
    /// Sanitized short synopsis.
    pub outline: String,
    /// High-definition flag.
    pub hd: bool,
    /// Title matched the configured well-known series pattern.
    well_known_title: bool,
    /// Detail payload, fetched at most once per instance.
    details: OnceCell<BroadcastDetails>,
}

impl Broadcast {
    /// Builds a broadcast from its wire payload.
    ///
    /// # Errors
    ///
    /// `Error::Decode` when a timestamp lies outside the representable
    /// range.
    pub(crate) fn from_payload(
        payload: BroadcastPayload,
        host: &str,
        tvshow_pattern: Option<&Regex>,
    ) -> Result<Self> {
        let starts_at = local_from_millis(payload.starts_at_ms)?;
        let ends_at = local_from_millis(payload.ends_at_ms)?;
        let duration = payload
            .ends_at_ms
            .saturating_sub(payload.starts_at_ms)
            .checked_div(60_000)
            .unwrap_or_default();

        let thumb_path = payload
            .image
            .and_then(|image| image.href)
            .unwrap_or_default();
        let thumb_url = if thumb_path.is_empty() {
            String::new()
        } else {
            format!("http://{host}{thumb_path}")
        };

        let serie = payload.serie.unwrap_or_default();
        let title = sanitize(payload.title.as_deref().unwrap_or_default());
        let well_known_title = tvshow_pattern.is_some_and(|pattern| pattern.is_match(&title));

        let categories = payload
            .categories
            .into_iter()
            .filter_map(|category| category.name)
            .map(|name| sanitize(&name))
            .filter(|name| !name.is_empty())
            .collect();

        Ok(Self {
            id: payload.id,
            title,
            subtitle: sanitize(payload.subtitle.as_deref().unwrap_or_default()),
            production_year: payload.production_year,
            starts_at,
            ends_at,
            duration,
            country: sanitize(payload.country.as_deref().unwrap_or_default()),
            thumb_url,
            channel_id: payload.channel_id,
            channel_name: sanitize(payload.channel_name.as_deref().unwrap_or_default()),
            channel_logo_url: channel_logo_url(host, payload.channel_id),
            season: serie.season.unwrap_or(0),
            episode: serie.episode.unwrap_or(0),
            total_episodes: serie.total_episodes.unwrap_or(0),
            categories,
            outline: sanitize(payload.short_text.as_deref().unwrap_or_default()),
            hd: payload.hd,
            well_known_title,
            details: OnceCell::new(),
        })
    }

    /// Whether this broadcast belongs to a series.
    ///
    /// True when season and episode are both set, or when the title matched
    /// the configured well-known series pattern.
    #[must_use]
    pub const fn is_tvshow(&self) -> bool {
        (self.season > 0 && self.episode > 0) || self.well_known_title
    }

    /// Returns the detail data, fetching it on first access.
    ///
    /// The fetch happens at most once per instance; concurrent first
    /// accesses share one request and later calls reuse the cached value.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail request or its decoding fails.
    pub async fn details(&self, api: &impl LocalBongApi) -> Result<&BroadcastDetails> {
        self.details
            .get_or_try_init(|| async {
                let payload = api.broadcast_details(self.id).await?;
                Ok(BroadcastDetails::from_payload(payload))
            })
            .await
    }
}

impl BroadcastDetails {
    pub(crate) fn from_payload(payload: BroadcastDetailsPayload) -> Self {
        Self {
            rating: payload.rating,
            votes: payload.votes,
            plot: sanitize(payload.long_text.as_deref().unwrap_or_default()),
            hint: sanitize(payload.hint_text.as_deref().unwrap_or_default()),
            directors: names_for(&payload, ROLE_DIRECTOR),
            authors: names_for(&payload, ROLE_AUTHOR),
            composers: names_for(&payload, ROLE_COMPOSER),
            actors: actors_for(&payload),
        }
    }
}

/// All people credited under the given role label.
fn people_for<'a>(
    payload: &'a BroadcastDetailsPayload,
    role: &'a str,
) -> impl Iterator<Item = &'a PersonPayload> {
    payload
        .roles
        .iter()
        .filter(move |group| group.name.as_deref() == Some(role))
        .flat_map(|group| group.people.iter())
}

/// Sanitized, sorted, deduplicated person names for one role label.
fn names_for(payload: &BroadcastDetailsPayload, role: &str) -> Vec<String> {
    let names: BTreeSet<String> = people_for(payload, role)
        .filter_map(|person| person.name.as_deref())
        .map(sanitize)
        .filter(|name| !name.is_empty())
        .collect();
    names.into_iter().collect()
}

/// Cast members, deduplicated by (name, role) pair.
fn actors_for(payload: &BroadcastDetailsPayload) -> Vec<Actor> {
    let actors: BTreeSet<Actor> = people_for(payload, ROLE_ACTOR)
        .map(|person| Actor {
            name: sanitize(person.name.as_deref().unwrap_or_default()),
            role: sanitize(person.role.as_deref().unwrap_or_default()),
        })
        .filter(|actor| !actor.name.is_empty())
        .collect();
    actors.into_iter().collect()
}

/// Converts provider epoch milliseconds to local calendar time.
fn local_from_millis(millis: i64) -> Result<DateTime<Local>> {
    match Local.timestamp_millis_opt(millis) {
        LocalResult::Single(datetime) => Ok(datetime),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(Error::Decode {
            message: format!("timestamp out of range: {millis}"),
        }),
    }
}
