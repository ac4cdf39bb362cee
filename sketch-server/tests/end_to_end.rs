//! Draw on the pad, save through the client, read back through the gallery.

mod common;

use std::sync::Arc;

use common::TestServer;
use sketch_app::{save_drawing, ClientError, HistoryClient, HistoryGallery, SaveError, SketchPad};
use sketch_core::{HistoryEntry, HistoryStore, PointerEvent, PointerPhase, StoreError, UserIdentity};
use sketch_renderer::decode_artifact;

#[derive(Debug)]
struct BrokenStore;

impl HistoryStore for BrokenStore {
    fn append(&self, _entry: HistoryEntry) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }

    fn entries(&self, _owner: &UserIdentity) -> Result<Vec<HistoryEntry>, StoreError> {
        Err(StoreError::Unavailable("offline".into()))
    }
}

fn drawn_pad() -> SketchPad {
    let mut pad = SketchPad::new();
    pad.mount_default().expect("mount");
    for event in [
        PointerEvent::mouse(PointerPhase::Down, 20.0, 20.0),
        PointerEvent::mouse(PointerPhase::Move, 300.0, 200.0),
        PointerEvent::mouse(PointerPhase::Move, 580.0, 20.0),
        PointerEvent::mouse(PointerPhase::Up, 580.0, 20.0),
    ] {
        pad.handle_event(&event);
    }
    pad
}

#[tokio::test]
async fn drawing_round_trips_through_history() {
    let server = TestServer::start().await;
    let client = HistoryClient::new(server.base_url()).expect("client");
    let owner = UserIdentity::new("artist-1");
    let pad = drawn_pad();

    let ack = save_drawing(&client, Some(&owner), &pad)
        .await
        .expect("save");
    assert_eq!(ack.message, "Image saved successfully!");

    let mut gallery = HistoryGallery::new();
    assert!(gallery.refresh(&client, &owner).await);
    assert_eq!(gallery.artifacts().len(), 1);

    let saved = decode_artifact(&gallery.artifacts()[0]).expect("decode saved");
    let local = decode_artifact(&pad.snapshot().expect("snapshot")).expect("decode local");
    assert!(saved.same_pixels(&local));
    assert_eq!((saved.width, saved.height), (600, 400));

    server.shutdown().await;
}

#[tokio::test]
async fn owner_named_save_round_trips() {
    let server = TestServer::start().await;
    let client = HistoryClient::new(server.base_url()).expect("client");
    let owner = UserIdentity::new("save");
    let pad = drawn_pad();

    save_drawing(&client, Some(&owner), &pad)
        .await
        .expect("save");
    let history = client.fetch(&owner).await.expect("fetch");
    assert_eq!(history, vec![pad.snapshot().expect("snapshot")]);

    server.shutdown().await;
}

#[tokio::test]
async fn save_without_identity_is_refused_locally() {
    let server = TestServer::start().await;
    let client = HistoryClient::new(server.base_url()).expect("client");

    let result = save_drawing(&client, None, &drawn_pad()).await;
    assert!(matches!(result, Err(SaveError::NoIdentity)));

    server.shutdown().await;
}

#[tokio::test]
async fn failed_save_keeps_the_drawing() {
    let server = TestServer::start_with_store(Arc::new(BrokenStore)).await;
    let client = HistoryClient::new(server.base_url()).expect("client");
    let owner = UserIdentity::new("artist-1");
    let pad = drawn_pad();
    let before = pad.snapshot().expect("snapshot");

    let result = save_drawing(&client, Some(&owner), &pad).await;
    assert!(matches!(
        result,
        Err(SaveError::Client(ClientError::Persistence(ref m))) if m == "Error saving image"
    ));
    assert_eq!(pad.snapshot().expect("snapshot"), before);

    server.shutdown().await;
}

#[tokio::test]
async fn failed_refresh_keeps_stale_gallery() {
    let server = TestServer::start().await;
    let client = HistoryClient::new(server.base_url()).expect("client");
    let owner = UserIdentity::new("artist-1");

    save_drawing(&client, Some(&owner), &drawn_pad())
        .await
        .expect("save");
    let mut gallery = HistoryGallery::new();
    assert!(gallery.refresh(&client, &owner).await);

    let base_url = server.base_url();
    server.shutdown().await;

    // Fresh client so no pooled connection outlives the server.
    let client = HistoryClient::new(base_url).expect("client");
    assert!(!gallery.refresh(&client, &owner).await);
    assert_eq!(gallery.artifacts().len(), 1);
    assert!(matches!(gallery.last_error(), Some(ClientError::Http(_))));
}
