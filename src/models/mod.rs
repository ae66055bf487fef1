//! Table row types.
//!
//! Provides the rows every transformation consumes and produces: validated
//! edges, toll rows with one column per vehicle class, and toll rows tagged
//! with a weekly travel window. Ingestion records are the loader-facing
//! counterparts; validating them is the only way to obtain an [`Edge`].

mod edge;
mod schedule;
mod toll;

pub use edge::{ingest_edges, Edge, EdgeRecord, NodeId};
pub use schedule::{ScheduleRecord, ScheduledTollRow, TravelWindow, WeekTime};
pub use toll::{TollRates, TollRow, VehicleClass};
