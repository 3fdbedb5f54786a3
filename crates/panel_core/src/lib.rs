//! Controller for the wiper panel: status indicator, sensor polling, command
//! dispatch and the simulated blade motion, driven by a single event loop.

pub mod animator;
pub mod controller;
pub mod dispatcher;
pub mod feedback;
pub mod motion;
pub mod poller;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod transport;

pub use controller::PanelController;
pub use dispatcher::{parse_cycles, PanelSelection};
pub use poller::{PollOrdering, PollTrigger, POLL_INTERVAL};
pub use runtime::{PanelInput, PanelRuntime};
pub use state::PanelState;
pub use status::{StatusIndicator, StatusKind};
pub use transport::{HttpTransport, PanelTransport};
