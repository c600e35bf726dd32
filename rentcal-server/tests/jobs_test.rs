//! Integration tests for the scheduled sync job

mod test_utils;

#[cfg(test)]
mod tests {
    use rentcal_core::{BookingStore, Property};
    use rentcal_server::jobs::sync_all_properties;

    use crate::test_utils::{ics_feed, seed_property, test_state};

    /// Tests one scheduled pass imports for every property with feeds
    #[tokio::test]
    async fn it_syncs_every_property() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/airbnb.ics")
            .with_status(200)
            .with_body(ics_feed(&[
                ("a-1", "Guest One", "20240601", "20240603"),
                ("a-2", "Guest Two", "20240610", "20240612"),
            ]))
            .create_async()
            .await;

        let state = test_state().await;
        seed_property(&state, Some(format!("{}/airbnb.ics", server.url())), None).await;
        state
            .store()
            .upsert_property(Property::new("no-feeds", "Unlisted Flat"))
            .await
            .unwrap();

        assert_eq!(sync_all_properties(state.syncer()).await, 2);
        assert_eq!(sync_all_properties(state.syncer()).await, 0);
        let bookings = state.store().list_bookings("beach-house").await.unwrap();
        assert_eq!(bookings.len(), 2);
    }
}
