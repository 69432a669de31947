use crate::{CycleStep, EngagementMetrics, Fragment, PreviewView};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub busy: bool,
    pub step: Option<CycleStep>,
    pub submit_enabled: bool,
    pub selected_file: Option<String>,
    pub preview: PreviewView,
    pub drop_active: bool,
    pub extracted_text: String,
    pub metrics: Option<EngagementMetrics>,
    pub recommendations: Fragment,
    pub notice: Option<String>,
    pub dirty: bool,
}
