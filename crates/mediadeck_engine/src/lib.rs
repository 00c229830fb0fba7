//! Mediadeck engine: HTTP transport, polling loops and action dispatch around the core store.
mod clock;
mod config;
mod decode;
mod dispatcher;
mod error;
mod events;
mod scheduler;
mod session;
mod shared;
mod transport;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use decode::{
    decode_ack, decode_full_snapshot, decode_media_info, decode_progress, DecodeError,
    ProgressPoll,
};
pub use dispatcher::ActionDispatcher;
pub use error::{ClientError, ConfigError};
pub use events::{ChannelEventSink, EventSink, NullEventSink};
pub use scheduler::{Backoff, PollSettings};
pub use session::ClientSession;
pub use transport::{Backend, ReqwestBackend};
pub use types::{
    Acknowledgement, ApiRequest, ApiResponse, Command, FailureKind, HttpMethod, PollKind,
    SessionEvent, TransportError,
};
