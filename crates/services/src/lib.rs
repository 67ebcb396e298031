#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod plan;
pub mod review;
pub mod session;
pub mod session_view;
pub mod simulator;
pub mod timer;

pub use exani_core::Clock;

pub use error::{ExportError, SessionError};
pub use plan::{ExamBuilder, ExamPlan};
pub use review::{ReviewEntry, ReviewStatus, StatusFilter};
pub use session::{ExamSession, NextStep};
pub use session_view::SessionSnapshot;
pub use simulator::ExamService;
