pub mod time_logs;
