use engage_logging::{engage_debug, engage_info, engage_warn};

use crate::{
    render, AppState, CycleId, CycleStep, Effect, EngagementMetrics, ExtractionOutcome, Msg,
    RecommendationOutcome, RecommendationResult,
};

pub const NO_TEXT_PLACEHOLDER: &str = "[No text extracted]";
pub const MISSING_FILE_NOTICE: &str = "Please select a file.";
pub const UPLOAD_ERROR_PREFIX: &str = "Upload error: ";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked(files) => match files.into_iter().next() {
            Some(file) => state.select_file(file),
            None => Vec::new(),
        },
        Msg::Drag(gesture) => {
            let was_active = state.drop_zone().is_active();
            let dropped = state.drop_zone_mut().handle(gesture);
            if state.drop_zone().is_active() != was_active {
                state.mark_dirty();
            }
            match dropped {
                Some(file) => state.select_file(file),
                None => Vec::new(),
            }
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ExtractionFinished { cycle, outcome } => {
            complete_step(&mut state, cycle, CycleStep::Extracting, |state| {
                apply_extraction(state, cycle, outcome)
            })
        }
        Msg::RecommendationFinished { cycle, outcome } => {
            complete_step(&mut state, cycle, CycleStep::Recommending, |state| {
                apply_recommendation(state, outcome);
                None
            })
        }
        Msg::NoticeDismissed => {
            state.clear_notice();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if let crate::Activity::Busy { cycle, .. } = state.activity() {
        engage_info!("Submit ignored: cycle {} still in flight", cycle);
        return Vec::new();
    }
    let Some(file) = state.selected().cloned() else {
        state.set_notice(MISSING_FILE_NOTICE);
        return Vec::new();
    };

    let cycle = state.begin_cycle();
    engage_info!(
        "Cycle {} started: name={} media_type={} bytes={}",
        cycle,
        file.name(),
        file.media_type(),
        file.len()
    );
    vec![Effect::ExtractText { cycle, file }]
}

/// Runs one step's completion inside the cycle scope. A step that yields no
/// follow-up effect ends the cycle, so every exit path returns to idle.
fn complete_step(
    state: &mut AppState,
    cycle: CycleId,
    step: CycleStep,
    handler: impl FnOnce(&mut AppState) -> Option<Effect>,
) -> Vec<Effect> {
    if !state.is_awaiting(cycle, step) {
        engage_debug!("Dropping stale {:?} completion for cycle {}", step, cycle);
        return Vec::new();
    }
    match handler(state) {
        Some(next) => vec![next],
        None => {
            state.finish_cycle();
            engage_info!("Cycle {} finished", cycle);
            Vec::new()
        }
    }
}

fn apply_extraction(
    state: &mut AppState,
    cycle: CycleId,
    outcome: ExtractionOutcome,
) -> Option<Effect> {
    match outcome {
        ExtractionOutcome::Extracted { text } => {
            let text = text.unwrap_or_default();
            engage_info!(
                "Cycle {} extracted {} chars: {}",
                cycle,
                text.chars().count(),
                engage_logging::excerpt(&text)
            );
            let shown = if text.is_empty() {
                NO_TEXT_PLACEHOLDER.to_string()
            } else {
                text.clone()
            };
            state.show_extracted(shown);
            state.advance(CycleStep::Recommending);
            Some(Effect::RequestRecommendations { cycle, text })
        }
        ExtractionOutcome::Rejected { payload } => {
            engage_warn!(
                "Cycle {} extraction rejected: {}",
                cycle,
                engage_logging::excerpt(&payload.to_string())
            );
            state.show_extracted(render::pretty_dump(&payload));
            None
        }
        ExtractionOutcome::Failed { reason } => {
            engage_warn!("Cycle {} extraction failed: {}", cycle, reason);
            state.show_extracted(format!("{UPLOAD_ERROR_PREFIX}{reason}"));
            None
        }
    }
}

fn apply_recommendation(state: &mut AppState, outcome: RecommendationOutcome) {
    match outcome {
        RecommendationOutcome::Received(payload) => {
            let metrics = EngagementMetrics::from_payload(&payload);
            let result = RecommendationResult::from_value(payload);
            engage_info!("Recommendations received from source {}", result.source());
            state.show_recommendations(render::render(&result), metrics);
        }
        RecommendationOutcome::Failed { reason } => {
            engage_warn!("Recommendation request failed: {}", reason);
            state.show_extracted(format!("{UPLOAD_ERROR_PREFIX}{reason}"));
        }
    }
}
