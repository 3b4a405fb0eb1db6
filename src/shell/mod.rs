// Composition root for the timesheets bounded context.
//
// Responsibilities:
// - Read config from the environment.
// - Instantiate the timesheet backend and the tracked session coordinators.
// - Wire REST and GraphQL inbound adapters into one router.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
