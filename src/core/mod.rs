pub mod dispatcher;
pub mod grouper;
pub mod pacing;
pub mod scheduler;
pub mod validator;

pub use crate::domain::model::{DispatchReport, EntryError, GroupedMessages, MessageRequest, Tenant};
pub use crate::domain::ports::{DelaySampler, DeliveryTransport, Sleeper, TenantRegistry};
pub use crate::utils::error::Result;
