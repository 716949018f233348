//! Subagent pool subsystem.
//!
//! Manages the numbered workspace directories under a pool root: the
//! [`slots`] allocator decides which slots a run touches, [`provision`]
//! materializes them from a template, [`lock`] tracks advisory lock markers,
//! [`discovery`] enumerates usable workspaces, and [`dispatch`] launches
//! editor sessions against them.

pub mod discovery;
pub mod dispatch;
pub mod lock;
pub mod provision;
pub mod slots;
