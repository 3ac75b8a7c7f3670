// LabDesk Domain
// This crate contains the report logic for the LabDesk application

// Services that implement report logic
pub mod services;

// Domain entities
pub mod entities;

// Seam to whatever turns a report document into bytes
pub mod export;

// Re-export the data crate for convenience
pub use lab_desk_data as data;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
