//! Text helpers shared by the message-stream driver.

pub mod grouping;
