//! Care scheduling: timestamp coercion, the next-care heuristic, display
//! formatting, and intake normalization for new care logs.

pub mod format;
pub mod handlers;
pub mod logs;
pub mod schedule;
pub mod timestamp;
