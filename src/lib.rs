//! Leitwolf - Conversational Dog Behaviour Coaching Backend
//!
//! This crate drives a multi-turn, single-topic-per-cycle conversation in
//! which a dog owner describes a behaviour, receives an interpretation spoken
//! "as the dog", optionally a recommended exercise, and closes the topic with
//! a fixed feedback questionnaire.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
