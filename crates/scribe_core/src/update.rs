use crate::{ControllerState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ControllerState, msg: Msg) -> (ControllerState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            if state.in_flight() {
                // Input is disabled while a job runs; ignore stray edits.
                return (state, Vec::new());
            }
            state.set_input(text);
            Vec::new()
        }
        Msg::FormatSelected(format) => {
            if state.in_flight() {
                return (state, Vec::new());
            }
            state.set_format(format);
            Vec::new()
        }
        Msg::SubmitPressed => {
            if state.in_flight() {
                // Precondition: the affordance is disabled while in flight.
                return (state, Vec::new());
            }
            let url = state.input().trim().to_string();
            if url.is_empty() {
                return (state, vec![Effect::PromptEmptyInput]);
            }
            let format = state.format();
            let job = state.begin_submission(url.clone());
            vec![Effect::StartJob { job, url, format }]
        }
        Msg::JobAccepted { job, task_id } => {
            state.accept(job, task_id);
            Vec::new()
        }
        Msg::PollProgress {
            job,
            attempt,
            update,
        } => {
            state.apply_progress(job, attempt, update);
            Vec::new()
        }
        Msg::JobSettled { job, outcome } => {
            state.settle(job, outcome);
            Vec::new()
        }
        Msg::TimerTick { job, elapsed_ms } => {
            state.apply_tick(job, elapsed_ms);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
