use jobboard_core::{
    update, BoardState, DetailPhase, DetailView, Effect, Generation, Job, LoadError, Msg,
};

fn job(id: &str) -> Job {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "job_title": "Platform Engineer",
        "company_name": "Acme",
        "job_location_name": "Remote",
        "salary_currency": "EUR",
        "salary_range_min": 60000,
        "salary_range_max": 80000,
        "start_date": "2025-01-01",
        "end_date": "2025-12-31",
        "job_type": "full-time",
        "job_description": "Build things.",
        "require_cv": true,
        "require_voicenote": true,
    }))
    .expect("valid job")
}

fn select(state: BoardState, job_id: &str) -> (BoardState, Generation) {
    let (state, effects) = update(
        state,
        Msg::JobSelected {
            job_id: job_id.to_string(),
        },
    );
    match effects.as_slice() {
        [Effect::FetchJob { generation, job_id: id }] => {
            assert_eq!(id, job_id);
            (state, *generation)
        }
        other => panic!("expected FetchJob, got {other:?}"),
    }
}

#[test]
fn selecting_a_job_loads_its_detail() {
    let (state, generation) = select(BoardState::new(), "abc123");
    assert_eq!(
        state.view().detail,
        Some(DetailView::Loading {
            job_id: "abc123".into()
        })
    );

    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation,
            job_id: "abc123".into(),
            result: Ok(job("abc123")),
        },
    );
    match state.view().detail {
        Some(DetailView::Loaded(detail)) => {
            assert_eq!(detail.title, "Platform Engineer");
            assert_eq!(detail.salary.as_deref(), Some("EUR 60000 - 80000"));
            assert_eq!(detail.required_documents, vec!["CV", "voice note"]);
        }
        other => panic!("expected loaded detail, got {other:?}"),
    }
}

#[test]
fn detail_flow_leaves_list_untouched() {
    let before = BoardState::new();
    let (state, _) = select(before.clone(), "abc123");
    assert_eq!(state.view().list, before.view().list);
    assert_eq!(state.generation(), before.generation());
}

#[test]
fn late_detail_for_previous_selection_is_ignored() {
    let (state, first) = select(BoardState::new(), "first");
    let (state, second) = select(state, "second");

    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: first,
            job_id: "first".into(),
            result: Ok(job("first")),
        },
    );
    assert_eq!(
        state.detail(),
        &DetailPhase::Loading {
            job_id: "second".into()
        }
    );

    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: second,
            job_id: "second".into(),
            result: Err(LoadError::parse("expected value at line 1 column 1")),
        },
    );
    match state.view().detail {
        Some(DetailView::Error { job_id, message }) => {
            assert_eq!(job_id, "second");
            assert!(message.starts_with("invalid response"));
        }
        other => panic!("expected detail error, got {other:?}"),
    }
}

#[test]
fn closing_detail_discards_pending_result() {
    let (state, generation) = select(BoardState::new(), "abc123");
    let (state, _) = update(state, Msg::DetailClosed);
    assert_eq!(state.view().detail, None);

    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation,
            job_id: "abc123".into(),
            result: Ok(job("abc123")),
        },
    );
    assert_eq!(state.detail(), &DetailPhase::Closed);
}

#[test]
fn blank_job_id_is_ignored() {
    let (state, effects) = update(
        BoardState::new(),
        Msg::JobSelected {
            job_id: "   ".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.detail(), &DetailPhase::Closed);
}
