//! `BongGuide` - the electronic program guide facade.

use chrono::{Days, Local, NaiveDate};
use tracing::instrument;

use super::api::LocalBongApi;
use super::broadcast::Broadcast;
use super::channel::Channel;
use super::error::Result;

/// Electronic program guide over the provider API.
///
/// Composes the authenticated client (or any other [`LocalBongApi`]
/// implementation) with the domain model. All returned lists are freshly
/// constructed value objects; nothing is cached here.
#[derive(Debug)]
pub struct BongGuide<'a, A> {
    api: &'a A,
}

impl<'a, A: LocalBongApi + Sync> BongGuide<'a, A> {
    /// Creates a guide over the given API.
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Lists all channels, ordered by the provider's position field.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel request fails.
    #[instrument(skip_all)]
    pub async fn channels(&self) -> Result<Vec<Channel>> {
        let mut channels: Vec<Channel> = self
            .api
            .list_channels()
            .await?
            .into_iter()
            .map(|payload| Channel::from_payload(payload, self.api.host()))
            .collect();
        channels.sort_by_key(|channel| channel.position);
        Ok(channels)
    }

    /// Looks up a single channel. An unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel request fails.
    pub async fn channel(&self, channel_id: u64) -> Result<Option<Channel>> {
        Ok(self
            .channels()
            .await?
            .into_iter()
            .find(|channel| channel.id == channel_id))
    }

    /// Lists the remaining broadcasts of one day on one channel.
    ///
    /// `offset` counts days from today: 0 today, 1 tomorrow, negative past.
    /// The result is ordered by start time; broadcasts whose start lies
    /// strictly before the current time are dropped, a broadcast starting
    /// exactly now is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the broadcast request fails.
    #[instrument(skip_all)]
    pub async fn broadcasts_per_day(
        &self,
        channel_id: u64,
        offset: i64,
    ) -> Result<Vec<Broadcast>> {
        let now = Local::now();
        let date = date_with_offset(now.date_naive(), offset);
        let mut broadcasts = self
            .api
            .list_broadcasts(channel_id, date)
            .await?
            .into_iter()
            .map(|payload| {
                Broadcast::from_payload(payload, self.api.host(), self.api.tvshow_title_pattern())
            })
            .collect::<Result<Vec<_>>>()?;
        broadcasts.sort_by_key(|broadcast| broadcast.starts_at);
        broadcasts.retain(|broadcast| broadcast.starts_at >= now);
        Ok(broadcasts)
    }

    /// Accumulates per-day broadcasts for up to `max_days` days.
    ///
    /// Stops at the first day the provider answers with an empty list,
    /// which is how it signals the end of its schedule data.
    ///
    /// # Errors
    ///
    /// Returns an error if any broadcast request fails.
    #[instrument(skip_all)]
    pub async fn broadcasts(&self, channel_id: u64, max_days: u32) -> Result<Vec<Broadcast>> {
        let mut all = Vec::new();
        for offset in 0..max_days {
            let daily = self
                .broadcasts_per_day(channel_id, i64::from(offset))
                .await?;
            if daily.is_empty() {
                tracing::debug!(channel_id, offset, "no more schedule data");
                break;
            }
            all.extend(daily);
        }
        Ok(all)
    }

    /// Server-side free-text broadcast search.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    #[instrument(skip_all)]
    pub async fn search_broadcasts(&self, pattern: &str) -> Result<Vec<Broadcast>> {
        self.api
            .search_broadcasts(pattern)
            .await?
            .into_iter()
            .map(|payload| {
                Broadcast::from_payload(payload, self.api.host(), self.api.tvshow_title_pattern())
            })
            .collect()
    }

    /// Searches broadcasts, then filters the result set by channel.
    ///
    /// The provider has no per-channel search; the filter happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    pub async fn search_broadcasts_per_channel(
        &self,
        pattern: &str,
        channel_id: u64,
    ) -> Result<Vec<Broadcast>> {
        let mut broadcasts = self.search_broadcasts(pattern).await?;
        broadcasts.retain(|broadcast| broadcast.channel_id == channel_id);
        Ok(broadcasts)
    }
}

/// Shifts a date by a signed number of days, saturating at today on
/// calendar overflow.
fn date_with_offset(today: NaiveDate, offset: i64) -> NaiveDate {
    let shifted = if offset >= 0 {
        today.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(offset.unsigned_abs()))
    };
    shifted.unwrap_or(today)
}
