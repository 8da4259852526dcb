#![allow(dead_code)]

pub mod agrodesk_env;
pub mod stub_backend;
