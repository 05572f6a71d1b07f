//! Connection handling. SQLite allows one writer at a time, so the engine
//! serializes every statement through a single mutex-guarded connection.

pub mod pragmas;
pub mod write_connection;

pub use write_connection::WriteConnection;
