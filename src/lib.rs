pub mod shared {
    pub mod core {
        pub mod primitives;
    }
}

pub mod modules {
    pub mod timesheets {
        pub mod core {
            pub mod active_session;
            pub mod day_log;
            pub mod decide;
            pub mod history;
            pub mod ports;
            pub mod time_arithmetic;
            pub mod time_log;
        }
        pub mod use_cases {
            pub mod track_session {
                pub mod coordinator;
                pub mod errors;
                pub mod live_timer;
                pub mod notifications;
                pub mod inbound {
                    pub mod graphql;
                }
            }
            pub mod list_time_logs {
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod record_attendance {
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod in_memory_timesheets;
            }
        }
    }
    pub mod onboarding {
        pub mod core {
            pub mod forms;
            pub mod stage;
            pub mod wizard;
        }
    }
}

pub mod shell;
