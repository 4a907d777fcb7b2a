//! Per-domain facades over [`MeridianClient`](crate::MeridianClient).
//!
//! Every method sends exactly one request and returns the decoded record.

mod compute;
mod documents;
mod legal;
mod payments;
mod voice;

pub use compute::{ComputeService, JobsService};
pub use documents::DocumentsService;
pub use legal::{CasesService, LegalService};
pub use payments::{ChargesService, PaymentsService};
pub use voice::{CallsService, VoiceService};
