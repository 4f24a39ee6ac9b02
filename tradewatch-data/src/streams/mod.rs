/// Idle timeout wrapper used to detect silent feed disconnects.
pub mod timeout;
