mod support;

use reelmark_core::application::WatchUnitOfWork;
use reelmark_core::config::{PlayerConfig, WatchConfig};
use reelmark_core::database::ports::{RecordQuery, WatchProgressRepository};
use reelmark_core::playback::{PlaybackSession, SessionOutcome, embed_url};
use reelmark_core::watch_status::ContinueWatchingView;
use reelmark_model::{
    ContentType, ContentTypeFilter, PlayerEvent, PlayerEventKind, WatchTarget,
};

use support::{init_tracing, manual_clock, update, user};

fn time_update(target: &WatchTarget, current: f64, duration: f64) -> PlayerEvent {
    PlayerEvent {
        event: PlayerEventKind::TimeUpdate,
        current_time: current,
        duration,
        progress: current / duration * 100.0,
        id: target.content_id().to_string(),
        media_type: target.content_type(),
        season: target.season_number(),
        episode: target.episode_number(),
        timestamp: 0,
    }
}

fn message(target: &WatchTarget, event: &str, current: f64, duration: f64) -> String {
    let mut data = serde_json::json!({
        "event": event,
        "currentTime": current,
        "duration": duration,
        "progress": current / duration * 100.0,
        "id": target.content_id().to_string(),
        "mediaType": target.content_type().as_str(),
        "timestamp": 1_700_000_000_000_i64,
    });
    if let (Some(season), Some(episode)) = (target.season_number(), target.episode_number()) {
        data["season"] = season.into();
        data["episode"] = episode.into();
    }
    serde_json::json!({ "type": "PLAYER_EVENT", "data": data }).to_string()
}

#[tokio::test]
async fn session_resumes_from_saved_position() {
    init_tracing();
    let uow = WatchUnitOfWork::with_clock(manual_clock());
    let alice = user("alice");
    let movie = WatchTarget::movie(10);
    uow.ingestor()
        .report_progress(Some(&alice), movie, update("Heat", 42.0, 2520.0, 6000.0))
        .await
        .unwrap();

    let resolver = uow.resolver(WatchConfig::default());
    let session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        Some(alice),
        movie,
        "Heat",
        Some("/heat.jpg".into()),
    )
    .await;

    assert_eq!(session.resume_at_secs(), Some(2520.0));
    let url = embed_url(&PlayerConfig::default(), session.target(), &session.embed_options())
        .unwrap();
    assert!(url.as_str().contains("progress=2520"));
}

#[tokio::test]
async fn fresh_session_has_no_resume_point() {
    init_tracing();
    let uow = WatchUnitOfWork::in_memory();
    let resolver = uow.resolver(WatchConfig::default());
    let session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        None,
        WatchTarget::episode(1399, 1, 1),
        "Game of Thrones",
        None,
    )
    .await;
    assert_eq!(session.resume_at_secs(), None);
    assert!(session.embed_options().episode_controls);
}

#[tokio::test]
async fn time_updates_are_sampled_and_saved() {
    init_tracing();
    let uow = WatchUnitOfWork::with_clock(manual_clock());
    let alice = user("alice");
    let episode = WatchTarget::episode(5, 1, 2);
    let resolver = uow.resolver(WatchConfig::default());
    let mut session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        Some(alice.clone()),
        episode,
        "Dark",
        Some("/dark.jpg".into()),
    )
    .await;

    let mut saved = Vec::new();
    for position in [0.5, 4.0, 9.0, 10.6, 15.0, 21.0] {
        let outcome = session
            .handle_event(&time_update(&episode, position, 3600.0))
            .await
            .unwrap();
        if let SessionOutcome::Saved(record) = outcome {
            saved.push(record.current_time_secs);
        }
    }
    assert_eq!(saved, vec![0.5, 10.6, 21.0]);

    let resume = resolver.resume_point(Some(&alice), episode).await.unwrap();
    assert_eq!(resume.current_time_secs, 21.0);
    assert_eq!(resume.title, "Dark");
}

#[tokio::test]
async fn other_events_and_other_content_are_ignored() {
    init_tracing();
    let uow = WatchUnitOfWork::with_clock(manual_clock());
    let alice = user("alice");
    let episode = WatchTarget::episode(5, 1, 2);
    let resolver = uow.resolver(WatchConfig::default());
    let mut session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        Some(alice),
        episode,
        "Dark",
        Some("/dark.jpg".into()),
    )
    .await;

    let mut pause = time_update(&episode, 100.0, 3600.0);
    pause.event = PlayerEventKind::Pause;
    assert_eq!(session.handle_event(&pause).await.unwrap(), SessionOutcome::Ignored);

    let other_series = WatchTarget::episode(6, 1, 2);
    assert_eq!(
        session
            .handle_event(&time_update(&other_series, 100.0, 3600.0))
            .await
            .unwrap(),
        SessionOutcome::Ignored
    );

    let mut wrong_type = time_update(&episode, 100.0, 3600.0);
    wrong_type.media_type = ContentType::Movie;
    assert_eq!(
        session.handle_event(&wrong_type).await.unwrap(),
        SessionOutcome::Ignored
    );
}

#[tokio::test]
async fn series_events_without_episode_numbers_save_under_the_session_episode() {
    init_tracing();
    let uow = WatchUnitOfWork::with_clock(manual_clock());
    let alice = user("alice");
    let episode = WatchTarget::episode(1399, 1, 1);
    let resolver = uow.resolver(WatchConfig::default());
    let mut session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        Some(alice.clone()),
        episode,
        "Game of Thrones",
        Some("/got.jpg".into()),
    )
    .await;

    let mut raw: serde_json::Value =
        serde_json::from_str(&message(&episode, "timeupdate", 300.0, 3000.0)).unwrap();
    let data = raw["data"].as_object_mut().unwrap();
    data.remove("season");
    data.remove("episode");

    let outcome = session.handle_message(&raw.to_string()).await.unwrap();
    let SessionOutcome::Saved(record) = outcome else {
        panic!("expected a saved sample, got {outcome:?}");
    };
    assert_eq!(*record.target(), episode);
    let stored = uow
        .progress
        .query_progress(&alice, &RecordQuery::new())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn session_follows_the_player_to_the_next_episode() {
    init_tracing();
    let uow = WatchUnitOfWork::with_clock(manual_clock());
    let alice = user("alice");
    let first = WatchTarget::episode(1399, 1, 1);
    let second = WatchTarget::episode(1399, 1, 2);
    let resolver = uow.resolver(WatchConfig::default());
    let mut session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        Some(alice.clone()),
        first,
        "Game of Thrones",
        Some("/got.jpg".into()),
    )
    .await;

    assert!(matches!(
        session.handle_event(&time_update(&first, 2990.0, 3000.0)).await.unwrap(),
        SessionOutcome::Saved(_)
    ));

    // Auto-advance restarts the clock near zero; the gate re-arms for it.
    let outcome = session
        .handle_event(&time_update(&second, 0.5, 3100.0))
        .await
        .unwrap();
    let SessionOutcome::Saved(record) = outcome else {
        panic!("expected a saved sample, got {outcome:?}");
    };
    assert_eq!(*record.target(), second);
    assert_eq!(*session.target(), second);
    assert_eq!(session.resume_at_secs(), None);

    let first_record = resolver
        .resume_point(Some(&alice), first)
        .await
        .expect("first episode kept");
    assert_eq!(first_record.current_time_secs, 2990.0);
    let second_record = resolver
        .resume_point(Some(&alice), second)
        .await
        .expect("second episode saved");
    assert_eq!(second_record.current_time_secs, 0.5);
}

#[tokio::test]
async fn raw_messages_drive_the_session() {
    init_tracing();
    let uow = WatchUnitOfWork::with_clock(manual_clock());
    let alice = user("alice");
    let movie = WatchTarget::movie(603);
    let resolver = uow.resolver(WatchConfig::default());
    let view = ContinueWatchingView::new(resolver.clone(), alice.clone(), ContentTypeFilter::All);
    let mut session = PlaybackSession::start(
        &resolver,
        uow.ingestor(),
        Some(alice.clone()),
        movie,
        "The Matrix",
        Some("/matrix.jpg".into()),
    )
    .await
    .with_view(view.clone());

    view.refresh().await.unwrap();
    assert!(view.rows().await.is_empty());

    let outcome = session
        .handle_message(&message(&movie, "timeupdate", 1200.0, 8160.0))
        .await
        .unwrap();
    assert!(matches!(outcome, SessionOutcome::Saved(_)));
    // A saved sample invalidates the row until the next refresh.
    assert!(view.rows().await.is_empty());
    let rows = view.refresh().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "The Matrix");

    assert_eq!(
        session.handle_message("{ broken").await.unwrap(),
        SessionOutcome::Ignored
    );
    assert_eq!(
        session.handle_message(r#"{"type":"PLAYER_READY"}"#).await.unwrap(),
        SessionOutcome::Ignored
    );
    assert_eq!(
        session
            .handle_message(&message(&movie, "timeupdate", 1203.0, 8160.0))
            .await
            .unwrap(),
        SessionOutcome::Throttled
    );
}

#[tokio::test]
async fn anonymous_sessions_surface_unauthenticated_on_save() {
    init_tracing();
    let uow = WatchUnitOfWork::in_memory();
    let movie = WatchTarget::movie(603);
    let resolver = uow.resolver(WatchConfig::default());
    let mut session =
        PlaybackSession::start(&resolver, uow.ingestor(), None, movie, "The Matrix", None).await;

    let err = session
        .handle_event(&time_update(&movie, 30.0, 8160.0))
        .await
        .unwrap_err();
    assert!(matches!(err, reelmark_core::WatchError::Unauthenticated));
}
