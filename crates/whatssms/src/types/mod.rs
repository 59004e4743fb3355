//! Request and response types for the WhatsSMS API.

mod send;

pub use send::*;
