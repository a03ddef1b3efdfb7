mod support;

use std::time::Duration;

use reelscope_core::search::{DebouncedSearch, SearchPhase, SearchSettings};
use reelscope_core::{FetchError, LocaleContext, RequestCoordinator};
use tokio::time::{Instant, sleep};

use support::{Call, ScriptedCatalog, movies, page_of, settle};

fn live_search(catalog: std::sync::Arc<ScriptedCatalog>) -> DebouncedSearch {
    DebouncedSearch::new(catalog, RequestCoordinator::new(), SearchSettings::default())
}

#[tokio::test(start_paused = true)]
async fn only_settled_input_reaches_the_catalog() {
    let catalog = ScriptedCatalog::answering(LocaleContext::new("en-US"), |_| {
        page_of(movies("Batman", 8), 1, 3)
    });
    let search = live_search(catalog.clone());
    let start = Instant::now();

    search.input("ba");
    sleep(Duration::from_millis(50)).await;
    search.input("bat");
    sleep(Duration::from_millis(50)).await;
    search.input("batm");
    sleep(Duration::from_millis(150)).await;
    search.input("batman");

    sleep(Duration::from_millis(299)).await;
    settle().await;
    assert_eq!(catalog.call_count(), 0);
    assert_eq!(search.snapshot().phase, SearchPhase::Pending);

    catalog.wait_for_calls(1).await;
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(550) && elapsed < Duration::from_millis(600),
        "search issued after {elapsed:?}"
    );
    settle().await;

    assert_eq!(catalog.call_count(), 1);
    assert!(matches!(
        &catalog.calls()[0],
        Call::Search { query, page: 1, .. } if query == "batman"
    ));

    let snapshot = search.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Resolved);
    assert_eq!(snapshot.query.as_deref(), Some("batman"));
    assert_eq!(snapshot.results.len(), 5);
    assert_eq!(snapshot.total_results, 24);
}

#[tokio::test(start_paused = true)]
async fn short_or_blank_input_never_searches() {
    let catalog = ScriptedCatalog::answering(LocaleContext::new("en-US"), |_| {
        page_of(movies("x", 1), 1, 1)
    });
    let search = live_search(catalog.clone());

    for text in ["", "a", "   ", " b ", "\t"] {
        search.input(text);
        sleep(Duration::from_secs(1)).await;
        settle().await;

        let snapshot = search.snapshot();
        assert!(snapshot.is_idle(), "{text:?} left phase {:?}", snapshot.phase);
        assert!(snapshot.results.is_empty());
    }
    assert_eq!(catalog.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn shrinking_below_minimum_cancels_pending_search() {
    let catalog = ScriptedCatalog::answering(LocaleContext::new("en-US"), |_| {
        page_of(movies("x", 1), 1, 1)
    });
    let search = live_search(catalog.clone());

    search.input("du");
    sleep(Duration::from_millis(200)).await;
    search.input("d");
    sleep(Duration::from_secs(1)).await;
    settle().await;

    assert_eq!(catalog.call_count(), 0);
    assert!(search.snapshot().is_idle());
}

#[tokio::test(start_paused = true)]
async fn identical_query_in_flight_is_not_reissued() {
    let catalog = ScriptedCatalog::gated(LocaleContext::new("en-US"));
    let search = live_search(catalog.clone());

    search.input("dune");
    catalog.wait_for_calls(1).await;
    assert_eq!(search.snapshot().phase, SearchPhase::Searching);

    search.input("dune ");
    search.input("Dune");
    sleep(Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(catalog.call_count(), 1);

    assert!(catalog.respond(0, page_of(movies("Dune", 2), 1, 1)));
    settle().await;
    let snapshot = search.snapshot();
    assert_eq!(snapshot.phase, SearchPhase::Resolved);
    assert_eq!(snapshot.results.len(), 2);
    assert_eq!(snapshot.input, "Dune");
}

#[tokio::test(start_paused = true)]
async fn results_for_outdated_input_are_dropped() {
    let catalog = ScriptedCatalog::gated(LocaleContext::new("en-US"));
    let search = live_search(catalog.clone());

    search.input("bat");
    catalog.wait_for_calls(1).await;
    search.input("batman");
    catalog.wait_for_calls(2).await;

    assert!(catalog.respond(1, page_of(movies("Batman", 3), 1, 1)));
    settle().await;
    // The older request was cancelled; even if it answers, nothing changes.
    let _ = catalog.respond(0, page_of(movies("Bat", 4), 1, 1));
    settle().await;

    let snapshot = search.snapshot();
    assert_eq!(snapshot.query.as_deref(), Some("batman"));
    assert_eq!(snapshot.phase, SearchPhase::Resolved);
    assert!(snapshot.results.iter().all(|item| item.title.starts_with("Batman")));
    assert_eq!(snapshot.results.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn failures_surface_and_clear_resets() {
    let catalog = ScriptedCatalog::gated(LocaleContext::new("en-US"));
    let search = live_search(catalog.clone());

    search.input("alien");
    catalog.wait_for_calls(1).await;
    catalog.respond(0, support::Reply::Error(FetchError::Network("offline".into())));
    settle().await;

    assert_eq!(
        search.snapshot().phase,
        SearchPhase::Failed(FetchError::Network("offline".into()))
    );

    search.clear();
    let snapshot = search.snapshot();
    assert!(snapshot.is_idle());
    assert!(snapshot.input.is_empty());
}

#[tokio::test(start_paused = true)]
async fn clearing_abandons_in_flight_request() {
    let catalog = ScriptedCatalog::gated(LocaleContext::new("en-US"));
    let coordinator = RequestCoordinator::new();
    let search = DebouncedSearch::new(
        catalog.clone(),
        coordinator.clone(),
        SearchSettings::default(),
    );

    search.input("heat");
    catalog.wait_for_calls(1).await;
    assert_eq!(coordinator.in_flight_count(), 1);

    search.clear();
    settle().await;
    assert_eq!(coordinator.in_flight_count(), 0);
    assert!(!catalog.respond(0, page_of(movies("Heat", 1), 1, 1)));
    assert!(search.snapshot().is_idle());
}

#[tokio::test(start_paused = true)]
async fn submit_skips_the_quiet_period() {
    let catalog = ScriptedCatalog::answering(LocaleContext::new("en-US"), |_| {
        page_of(movies("Alien", 2), 1, 1)
    });
    let search = live_search(catalog.clone());
    let start = Instant::now();

    search.submit("alien").await;

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(search.snapshot().phase, SearchPhase::Resolved);
    assert_eq!(catalog.call_count(), 1);
}
