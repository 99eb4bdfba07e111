//! Application orchestration — the interactive flows the binary runs.

pub mod flow;
