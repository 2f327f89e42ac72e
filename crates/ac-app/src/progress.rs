#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    CheckingCache,
    LoadingCachedReport,
    ResolvingSeries,
    Computing,
    SavingReport,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingProject => "loading-project",
            RunStage::CheckingCache => "checking-cache",
            RunStage::LoadingCachedReport => "loading-cached-report",
            RunStage::ResolvingSeries => "resolving-series",
            RunStage::Computing => "computing",
            RunStage::SavingReport => "saving-report",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }
}
