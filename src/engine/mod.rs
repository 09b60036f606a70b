pub mod context; // AudioContext and ContextFactory seams
pub mod device; // cpal output
pub mod mixer;
pub mod offline;
pub mod scheduler; // Look-ahead beat booking
pub mod timer;
pub mod transport;
