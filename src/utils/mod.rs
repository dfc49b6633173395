/// Session context
pub mod app_context;
/// Constants
pub mod constants;
/// Logger
pub mod logger;
