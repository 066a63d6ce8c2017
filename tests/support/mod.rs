#![allow(dead_code)]

pub mod fake_service;
pub mod scry_env;
