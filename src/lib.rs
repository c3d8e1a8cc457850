//! Career Plus Assistant - conversational assistant for the gig marketplace
//!
//! Guides users through posting gigs, registering as a freelancer and
//! finding work, and hands open-ended questions to a remote language model.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
