use crate::view_model::AppViewModel;
use crate::{DropZone, EngagementMetrics, Fragment, PreviewState, SelectedFile};

pub type CycleId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    Extracting,
    Recommending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Busy { cycle: CycleId, step: CycleStep },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    activity: Activity,
    last_cycle: CycleId,
    selected: Option<SelectedFile>,
    preview: PreviewState,
    drop_zone: DropZone,
    extracted: String,
    metrics: Option<EngagementMetrics>,
    recommendations: Fragment,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let (busy, step) = match self.activity {
            Activity::Idle => (false, None),
            Activity::Busy { step, .. } => (true, Some(step)),
        };
        AppViewModel {
            busy,
            step,
            submit_enabled: !busy,
            selected_file: self.selected.as_ref().map(|file| file.name().to_string()),
            preview: self.preview.view(),
            drop_active: self.drop_zone.is_active(),
            extracted_text: self.extracted.clone(),
            metrics: self.metrics,
            recommendations: self.recommendations.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_busy(&self) -> bool {
        self.activity != Activity::Idle
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    /// Returns whether a re-render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn drop_zone_mut(&mut self) -> &mut DropZone {
        &mut self.drop_zone
    }

    pub(crate) fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    /// Installs `file` as the selection, superseding the previous one.
    pub(crate) fn select_file(&mut self, file: SelectedFile) -> Vec<crate::Effect> {
        let effects = self.preview.select(&file);
        self.selected = Some(file);
        self.mark_dirty();
        effects
    }

    /// Enters the busy state for a fresh cycle and clears prior results.
    pub(crate) fn begin_cycle(&mut self) -> CycleId {
        self.last_cycle += 1;
        let cycle = self.last_cycle;
        self.activity = Activity::Busy {
            cycle,
            step: CycleStep::Extracting,
        };
        self.extracted.clear();
        self.recommendations = Fragment::default();
        self.metrics = None;
        self.notice = None;
        self.mark_dirty();
        cycle
    }

    /// True when `cycle` is the in-flight cycle and it is waiting on `step`.
    pub(crate) fn is_awaiting(&self, cycle: CycleId, step: CycleStep) -> bool {
        self.activity == Activity::Busy { cycle, step }
    }

    pub(crate) fn advance(&mut self, step: CycleStep) {
        if let Activity::Busy { cycle, .. } = self.activity {
            self.activity = Activity::Busy { cycle, step };
            self.mark_dirty();
        }
    }

    pub(crate) fn finish_cycle(&mut self) {
        self.activity = Activity::Idle;
        self.mark_dirty();
    }

    pub(crate) fn show_extracted(&mut self, text: String) {
        self.extracted = text;
        self.mark_dirty();
    }

    pub(crate) fn show_recommendations(
        &mut self,
        fragment: Fragment,
        metrics: Option<EngagementMetrics>,
    ) {
        self.recommendations = fragment;
        self.metrics = metrics;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: &str) {
        self.notice = Some(notice.to_string());
        self.mark_dirty();
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }
}
