use crate::{BoardState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BoardState, msg: Msg) -> (BoardState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.is_idle() {
                vec![state.begin_query(false)]
            } else {
                Vec::new()
            }
        }
        Msg::FilterChanged(change) => vec![state.apply_filter(change)],
        Msg::FiltersReset => vec![state.reset_filters()],
        Msg::RefreshRequested => vec![state.begin_query(true)],
        Msg::PageSelected(page) => {
            state.select_page(page);
            Vec::new()
        }
        Msg::PreviousPage => {
            state.step_page(false);
            Vec::new()
        }
        Msg::NextPage => {
            state.step_page(true);
            Vec::new()
        }
        Msg::JobsLoaded { generation, result } => {
            state.apply_jobs(generation, result);
            Vec::new()
        }
        Msg::JobSelected { job_id } => {
            let job_id = job_id.trim().to_string();
            if job_id.is_empty() {
                Vec::new()
            } else {
                vec![state.open_detail(job_id)]
            }
        }
        Msg::JobLoaded {
            generation,
            job_id,
            result,
        } => {
            state.apply_job(generation, job_id, result);
            Vec::new()
        }
        Msg::DetailClosed => {
            state.close_detail();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
