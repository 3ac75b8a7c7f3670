// LabDesk Data
// This crate handles upstream report payloads and the sources they come from

// Wire models for report payloads and lab information
pub mod models;

// Read-only report sources
pub mod repository;
