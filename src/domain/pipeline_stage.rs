use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    Classified,
    Transcoded,
    PassedThrough,
    QuotaChecked,
    Transcribed,
    Deducted,
    Completed,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "RECEIVED",
            PipelineStage::Classified => "CLASSIFIED",
            PipelineStage::Transcoded => "TRANSCODED",
            PipelineStage::PassedThrough => "PASSED_THROUGH",
            PipelineStage::QuotaChecked => "QUOTA_CHECKED",
            PipelineStage::Transcribed => "TRANSCRIBED",
            PipelineStage::Deducted => "DEDUCTED",
            PipelineStage::Completed => "COMPLETED",
            PipelineStage::Failed => "FAILED",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
