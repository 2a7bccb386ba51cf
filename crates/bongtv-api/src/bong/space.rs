//! `BongSpace` - the personal recording space facade.

use tracing::instrument;

use super::api::LocalBongApi;
use super::error::{Error, Result};
use super::recording::Recording;

/// Subscription capacity reported by the login response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    /// Used PVR capacity.
    pub used_capacity: u64,
    /// Maximum PVR capacity.
    pub max_capacity: u64,
    /// Used capacity in percent, 0..=100.
    pub used_space_percent: u8,
}

/// The user's recording space over the provider API.
#[derive(Debug)]
pub struct BongSpace<'a, A> {
    api: &'a A,
}

impl<'a, A: LocalBongApi + Sync> BongSpace<'a, A> {
    /// Creates a recording space over the given API.
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Lists the user's recordings, ordered by broadcast start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the recordings request fails.
    #[instrument(skip_all)]
    pub async fn recordings(&self) -> Result<Vec<Recording>> {
        let mut recordings = self
            .api
            .list_recordings()
            .await?
            .into_iter()
            .map(|payload| {
                Recording::from_payload(payload, self.api.host(), self.api.tvshow_title_pattern())
            })
            .collect::<Result<Vec<_>>>()?;
        recordings.sort_by_key(|recording| recording.broadcast().starts_at);
        Ok(recordings)
    }

    /// Looks up a single recording. An unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the recordings request fails.
    pub async fn recording(&self, recording_id: u64) -> Result<Option<Recording>> {
        Ok(self
            .recordings()
            .await?
            .into_iter()
            .find(|recording| recording.id == recording_id))
    }

    /// Schedules a recording for the given broadcast.
    ///
    /// # Errors
    ///
    /// `Error::Recording` when the provider refuses to schedule the
    /// broadcast (conflict, already over, out of space); other errors if
    /// the request fails.
    #[instrument(skip_all)]
    pub async fn create_recording(&self, broadcast_id: u64) -> Result<Recording> {
        let payload = self.api.create_recording(broadcast_id).await?;
        Recording::from_payload(payload, self.api.host(), self.api.tvshow_title_pattern())
    }

    /// Deletes a recording.
    ///
    /// A provider answer of "not found" means the recording is already
    /// gone and is swallowed; every other failure propagates.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete request fails for any reason other
    /// than the recording being absent.
    #[instrument(skip_all)]
    pub async fn delete_recording(&self, recording_id: u64) -> Result<()> {
        match self.api.delete_recording(recording_id).await {
            Err(Error::NotFound) => {
                tracing::debug!(recording_id, "recording already gone");
                Ok(())
            }
            other => other,
        }
    }

    /// Reads the subscription capacity from the login response.
    ///
    /// # Errors
    ///
    /// `Error::Decode` when the response lacks subscription data or
    /// reports a used-space percentage outside 0..=100; other errors if
    /// the login fails.
    pub async fn subscription(&self) -> Result<Subscription> {
        let account = self.api.login().await?;
        let subscription = account.subscription.ok_or_else(|| Error::Decode {
            message: String::from("missing subscription data"),
        })?;
        let used_space_percent = subscription.used_space_percent.ok_or_else(|| Error::Decode {
            message: String::from("missing used_space_percent"),
        })?;
        if used_space_percent > 100 {
            return Err(Error::Decode {
                message: format!("used_space_percent out of range: {used_space_percent}"),
            });
        }
        Ok(Subscription {
            used_capacity: subscription.usedcap.ok_or_else(|| Error::Decode {
                message: String::from("missing usedcap"),
            })?,
            max_capacity: subscription.maxcap.ok_or_else(|| Error::Decode {
                message: String::from("missing maxcap"),
            })?,
            used_space_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use chrono::NaiveDate;
    use regex::Regex;

    use super::*;
    use crate::bong::types::{
        AccountPayload, BroadcastDetailsPayload, BroadcastPayload, ChannelPayload, FilePayload,
        RecordingPayload, SubscriptionPayload,
    };

    /// Mock API over a fixed recording list.
    struct MockBongApi {
        recordings: Vec<RecordingPayload>,
        delete_result: fn() -> Result<()>,
        subscription: Option<SubscriptionPayload>,
    }

    impl MockBongApi {
        fn new(recordings: Vec<RecordingPayload>) -> Self {
            Self {
                recordings,
                delete_result: || Ok(()),
                subscription: None,
            }
        }
    }

    impl LocalBongApi for MockBongApi {
        fn host(&self) -> &str {
            "bong.tv"
        }

        fn tvshow_title_pattern(&self) -> Option<&Regex> {
            None
        }

        async fn login(&self) -> Result<AccountPayload> {
            Ok(AccountPayload {
                subscription: self.subscription.clone(),
            })
        }

        async fn list_recordings(&self) -> Result<Vec<RecordingPayload>> {
            Ok(self.recordings.clone())
        }

        async fn create_recording(&self, broadcast_id: u64) -> Result<RecordingPayload> {
            if broadcast_id == 666 {
                return Err(Error::Recording);
            }
            Ok(recording_payload(1, broadcast_id, 1_400_000_000_000))
        }

        async fn delete_recording(&self, _recording_id: u64) -> Result<()> {
            (self.delete_result)()
        }

        async fn list_channels(&self) -> Result<Vec<ChannelPayload>> {
            Ok(vec![])
        }

        async fn list_broadcasts(
            &self,
            _channel_id: u64,
            _date: NaiveDate,
        ) -> Result<Vec<BroadcastPayload>> {
            Ok(vec![])
        }

        async fn broadcast_details(&self, _broadcast_id: u64) -> Result<BroadcastDetailsPayload> {
            Ok(BroadcastDetailsPayload::default())
        }

        async fn search_broadcasts(&self, _query: &str) -> Result<Vec<BroadcastPayload>> {
            Ok(vec![])
        }
    }

    fn recording_payload(id: u64, broadcast_id: u64, starts_at_ms: i64) -> RecordingPayload {
        RecordingPayload {
            id,
            status: Some(String::from("recorded")),
            quality: Some(1),
            files: vec![FilePayload {
                quality: Some(String::from("NQ")),
                href: Some(format!("http://bong.tv/files/{id}_nq.mp4")),
            }],
            broadcast: BroadcastPayload {
                id: broadcast_id,
                starts_at_ms,
                ends_at_ms: starts_at_ms + 900_000,
                channel_id: 7,
                ..BroadcastPayload::default()
            },
        }
    }

    #[tokio::test]
    async fn test_recordings_sorted_by_start_time() {
        // Arrange: later recording listed first
        let api = MockBongApi::new(vec![
            recording_payload(2, 200, 1_400_100_000_000),
            recording_payload(1, 100, 1_400_000_000_000),
        ]);
        let space = BongSpace::new(&api);

        // Act
        let recordings = space.recordings().await.unwrap();

        // Assert
        assert_eq!(recordings[0].id, 1);
        assert_eq!(recordings[1].id, 2);
    }

    #[tokio::test]
    async fn test_recording_lookup_misses_are_not_errors() {
        // Arrange
        let api = MockBongApi::new(vec![recording_payload(1, 100, 1_400_000_000_000)]);
        let space = BongSpace::new(&api);

        // Act & Assert
        assert!(space.recording(1).await.unwrap().is_some());
        assert!(space.recording(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_recording_rejection_stays_typed() {
        // Arrange
        let api = MockBongApi::new(vec![]);
        let space = BongSpace::new(&api);

        // Act
        let created = space.create_recording(100).await;
        let rejected = space.create_recording(666).await;

        // Assert
        assert!(created.is_ok());
        assert!(matches!(rejected, Err(Error::Recording)));
    }

    #[tokio::test]
    async fn test_delete_swallows_not_found_only() {
        // Arrange
        let mut api = MockBongApi::new(vec![]);
        api.delete_result = || Err(Error::NotFound);
        let space = BongSpace::new(&api);

        // Act & Assert: already-gone recordings are fine
        assert!(space.delete_recording(9).await.is_ok());

        // Arrange: any other failure propagates
        api.delete_result = || Err(Error::Server { status: 502 });
        let space = BongSpace::new(&api);

        // Act & Assert
        assert!(matches!(
            space.delete_recording(9).await,
            Err(Error::Server { status: 502 })
        ));
    }

    #[tokio::test]
    async fn test_subscription_from_login_response() {
        // Arrange
        let mut api = MockBongApi::new(vec![]);
        api.subscription = Some(SubscriptionPayload {
            usedcap: Some(10),
            maxcap: Some(100),
            used_space_percent: Some(10),
        });
        let space = BongSpace::new(&api);

        // Act
        let subscription = space.subscription().await.unwrap();

        // Assert
        assert_eq!(subscription.used_capacity, 10);
        assert_eq!(subscription.max_capacity, 100);
        assert_eq!(subscription.used_space_percent, 10);
    }

    #[tokio::test]
    async fn test_subscription_percent_out_of_range_rejected() {
        // Arrange
        let mut api = MockBongApi::new(vec![]);
        api.subscription = Some(SubscriptionPayload {
            usedcap: Some(10),
            maxcap: Some(100),
            used_space_percent: Some(150),
        });
        let space = BongSpace::new(&api);

        // Act
        let result = space.subscription().await;

        // Assert
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[tokio::test]
    async fn test_subscription_missing_data_rejected() {
        // Arrange
        let api = MockBongApi::new(vec![]);
        let space = BongSpace::new(&api);

        // Act
        let result = space.subscription().await;

        // Assert
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
