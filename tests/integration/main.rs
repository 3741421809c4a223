//! Router-level integration tests for the subscription API.

mod client_test;
mod helpers;
mod subscription_test;
