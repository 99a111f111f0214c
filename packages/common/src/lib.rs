pub mod api;
pub mod retry;

pub use api::{ComparisonLogs, DiffDocument, DiffSummary, ErrorBody, UploadAck};
pub use retry::{BudgetDecision, FailureBudget};
