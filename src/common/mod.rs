// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod hash;
pub mod period;
pub mod response;
pub mod ring;
pub mod signal;
pub mod text;
pub mod timestamp;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::TpAddress;

// From command.rs
pub use command::{AtCommand, CommandBuffer};

// From error.rs
pub use error::ModemError;

// From frame.rs
pub use frame::{FrameEvent, LineBuffer};

// From hal_traits.rs
pub use hal_traits::{ModemClock, ModemPins, ModemSerial};

// From hash.rs
pub use hash::CommandHash;

// From period.rs
pub use period::MsPeriod;

// From response/mod.rs
pub use response::{classify_line, DataLine, LineKind, ResponseParseError};

// From ring.rs
pub use ring::MessageRing;

// From signal.rs
pub use signal::EventFlag;

// From text.rs
pub use text::{find_token, get_token, Fixed16, Scanner};

// From timestamp.rs
pub use timestamp::parse_modem_time;

// From types.rs
pub use types::{CommandState, RegistrationStatus, SleepState, SmsStatus};

// --- Feature-gated re-exports ---

// Native HAL integration (from hal_traits.rs)
#[cfg(feature = "impl-native")]
pub use hal_traits::HalInterface;
