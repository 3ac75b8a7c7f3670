// LabDesk CLI
// Configuration, logging, exporters and share links behind the `labdesk` binary

pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod logging;
pub mod share;
