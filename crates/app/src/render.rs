//! View-model renderers.
//!
//! Each renderer turns [`DashboardState`](crate::state::DashboardState) into a
//! plain data structure that the UI adapter binds to. Keeping them DOM-free
//! lets the reconciliation rules be tested natively.

pub mod cards;
pub mod chart;
pub mod table;

pub use cards::{CardBoard, DeviceCard, ReconcileReport};
pub use chart::{ChartModel, ChartSeries, ChartSession, ChartUpdate};
pub use table::{TableCell, TableRow, TableView};
