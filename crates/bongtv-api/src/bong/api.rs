//! `BongApi` trait definition.
#![allow(clippy::future_not_send)]

use chrono::NaiveDate;
use regex::Regex;

use super::error::Result;
use super::types::{
    AccountPayload, BroadcastDetailsPayload, BroadcastPayload, ChannelPayload, RecordingPayload,
};

/// bong.tv API trait.
///
/// Abstracts the wire operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(BongApi: Send)]
pub trait LocalBongApi {
    /// Provider host, used to derive channel logo and thumbnail URLs.
    fn host(&self) -> &str;

    /// Pattern matching titles of well-known series that the provider
    /// ships without season/episode numbering.
    fn tvshow_title_pattern(&self) -> Option<&Regex>;

    /// Logs in with the configured credentials and returns account data.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected, the response
    /// carries no session cookie, or the HTTP request fails.
    async fn login(&self) -> Result<AccountPayload>;

    /// Lists the user's recordings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn list_recordings(&self) -> Result<Vec<RecordingPayload>>;

    /// Schedules a recording for the given broadcast.
    ///
    /// # Errors
    ///
    /// `Error::Recording` when the provider refuses to schedule (HTTP 422);
    /// other errors if the HTTP request or JSON decoding fails.
    async fn create_recording(&self, broadcast_id: u64) -> Result<RecordingPayload>;

    /// Deletes a recording.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` when the recording does not exist; other errors if
    /// the HTTP request fails.
    async fn delete_recording(&self, recording_id: u64) -> Result<()>;

    /// Lists all channels.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn list_channels(&self) -> Result<Vec<ChannelPayload>>;

    /// Lists the broadcasts of one channel on one calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn list_broadcasts(
        &self,
        channel_id: u64,
        date: NaiveDate,
    ) -> Result<Vec<BroadcastPayload>>;

    /// Fetches the expensive detail data of one broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn broadcast_details(&self, broadcast_id: u64) -> Result<BroadcastDetailsPayload>;

    /// Server-side free-text broadcast search.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn search_broadcasts(&self, query: &str) -> Result<Vec<BroadcastPayload>>;
}
