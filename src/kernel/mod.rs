//! Headless session core (state/action/effect).

pub mod action;
pub mod effect;
pub mod persistence;
pub mod preview;
pub mod scan;
pub mod services;
pub mod state;
pub mod store;
pub mod view_mode;

pub use action::Action;
pub use effect::Effect;
pub use persistence::{session_key, PersistError, PersistenceGateway};
pub use scan::{ScanCoordinator, ScanRequest};
pub use state::{
    AppState, ConfirmDialogState, PendingAction, RequestTracker, SessionState, SidebarTab, Theme,
    SESSION_VERSION,
};
pub use store::{DispatchResult, Store};
pub use view_mode::{ViewMode, ViewModeController};
