use std::time::{Duration, Instant};

use jobboard_core::{
    update, BoardState, Effect, FilterChange, FilterCriteria, ListStatus, LoadError,
    LoadErrorKind, Msg,
};
use jobboard_engine::{ApiConfig, ApiErrorKind, CachePolicy, EngineEvent, EngineHandle};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn criteria(term: &str) -> FilterCriteria {
    FilterCriteria {
        search_term: term.into(),
        ..FilterCriteria::default()
    }
}

async fn mount_search(server: &MockServer, term: &str, delay: Duration, titles: &[&str]) {
    let body: Vec<_> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| json!({ "id": format!("{term}-{i}"), "job_title": title }))
        .collect();
    Mock::given(method("POST"))
        .and(path("/job/get-jobs-open/"))
        .and(body_json(serde_json::to_value(criteria(term)).unwrap()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(delay)
                .set_body_json(body),
        )
        .mount(server)
        .await;
}

fn engine_for(server: &MockServer) -> EngineHandle {
    engine_with_cache(server, CachePolicy::default())
}

fn engine_with_cache(server: &MockServer, cache: CachePolicy) -> EngineHandle {
    let mut config = ApiConfig::from_var(Some(&server.uri())).unwrap();
    config.cache = cache;
    EngineHandle::new(config).expect("engine")
}

fn run_effects(engine: &EngineHandle, effects: Vec<Effect>) {
    for effect in effects {
        let sent = match effect {
            Effect::FetchJobs {
                generation,
                criteria,
                refresh: false,
            } => engine.fetch_jobs(generation, criteria),
            Effect::FetchJobs {
                generation,
                criteria,
                refresh: true,
            } => engine.refresh_jobs(generation, criteria),
            Effect::FetchJob { generation, job_id } => engine.fetch_job(generation, job_id),
        };
        sent.expect("engine accepts commands");
    }
}

/// Feeds engine results for `window` back into `state`.
async fn settle(engine: &EngineHandle, mut state: BoardState, window: Duration) -> BoardState {
    for event in collect_events(engine, window).await {
        let msg = match event {
            EngineEvent::JobsFetched { generation, result } => Msg::JobsLoaded {
                generation,
                result: result.map_err(LoadError::from),
            },
            EngineEvent::JobFetched {
                generation,
                job_id,
                result,
            } => Msg::JobLoaded {
                generation,
                job_id,
                result: result.map_err(LoadError::from),
            },
        };
        state = update(state, msg).0;
    }
    state
}

async fn list_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/job/get-jobs-open/")
        .count()
}

async fn collect_events(engine: &EngineHandle, window: Duration) -> Vec<EngineEvent> {
    let deadline = Instant::now() + window;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => events.push(event),
            None => tokio::time::sleep(Duration::from_millis(20)).await,
        }
    }
    events
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn superseded_list_fetch_reports_nothing() {
    jobboard_logging::initialize_for_tests();
    let server = MockServer::start().await;
    mount_search(&server, "slow", Duration::from_millis(300), &["Stale"]).await;
    mount_search(&server, "fast", Duration::ZERO, &["Fresh"]).await;
    let engine = engine_for(&server);

    engine.fetch_jobs(1, criteria("slow")).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.fetch_jobs(2, criteria("fast")).unwrap();

    let events = collect_events(&engine, Duration::from_millis(700)).await;
    assert_eq!(events.len(), 1, "only the latest generation reports: {events:?}");
    match &events[0] {
        EngineEvent::JobsFetched { generation, result } => {
            assert_eq!(*generation, 2);
            let jobs = result.as_ref().expect("jobs");
            assert_eq!(jobs[0].job_title, "Fresh");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn detail_fetch_reports_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/get-job-item/abc123/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": "))
        .mount(&server)
        .await;
    let engine = engine_for(&server);

    engine.fetch_job(7, "abc123").unwrap();
    let events = collect_events(&engine, Duration::from_millis(400)).await;

    match events.as_slice() {
        [EngineEvent::JobFetched {
            generation,
            job_id,
            result: Err(err),
        }] => {
            assert_eq!(*generation, 7);
            assert_eq!(job_id, "abc123");
            assert_eq!(err.kind, ApiErrorKind::Parse);
            let load: LoadError = err.clone().into();
            assert_eq!(load.kind, LoadErrorKind::Parse);
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_results_drive_the_board_state() {
    let server = MockServer::start().await;
    let titles: Vec<String> = (0..20).map(|i| format!("Job {i}")).collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    mount_search(&server, "", Duration::ZERO, &titles).await;
    let engine = engine_for(&server);

    let (state, effects) = update(BoardState::new(), Msg::Started);
    run_effects(&engine, effects);
    let state = settle(&engine, state, Duration::from_millis(400)).await;

    let view = state.view();
    assert_eq!(view.list.status, ListStatus::Results);
    assert_eq!(view.list.total_pages, 3);
    assert_eq!(view.list.rows.len(), 8);
    assert_eq!(view.list.rows[0].title, "Job 0");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_requeries_despite_cache_ttl() {
    let server = MockServer::start().await;
    mount_search(&server, "", Duration::ZERO, &["Only"]).await;
    let engine = engine_with_cache(
        &server,
        CachePolicy {
            ttl: Some(Duration::from_secs(60)),
        },
    );

    let (state, effects) = update(BoardState::new(), Msg::Started);
    run_effects(&engine, effects);
    let state = settle(&engine, state, Duration::from_millis(300)).await;
    assert_eq!(state.view().list.status, ListStatus::Results);
    assert_eq!(list_requests(&server).await, 1);

    // Re-applying the same criteria is served from the cache.
    let (state, effects) = update(
        state,
        Msg::FilterChanged(FilterChange::SearchTerm(String::new())),
    );
    run_effects(&engine, effects);
    let state = settle(&engine, state, Duration::from_millis(300)).await;
    assert_eq!(state.view().list.status, ListStatus::Results);
    assert_eq!(list_requests(&server).await, 1);

    let (state, effects) = update(state, Msg::RefreshRequested);
    run_effects(&engine, effects);
    let state = settle(&engine, state, Duration::from_millis(300)).await;
    assert_eq!(state.view().list.status, ListStatus::Results);
    assert_eq!(list_requests(&server).await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_without_cache_issues_another_request() {
    let server = MockServer::start().await;
    mount_search(&server, "", Duration::ZERO, &["Only"]).await;
    let engine = engine_for(&server);

    let (state, effects) = update(BoardState::new(), Msg::Started);
    run_effects(&engine, effects);
    let state = settle(&engine, state, Duration::from_millis(300)).await;

    let (state, effects) = update(state, Msg::RefreshRequested);
    assert_eq!(state.view().list.status, ListStatus::Loading);
    run_effects(&engine, effects);
    let state = settle(&engine, state, Duration::from_millis(300)).await;

    assert_eq!(state.view().list.status, ListStatus::Results);
    assert_eq!(state.view().list.rows[0].title, "Only");
    assert_eq!(list_requests(&server).await, 2);
}
