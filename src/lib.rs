pub mod algorithms;
pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod grid;
pub mod player;
pub mod recorder;
pub mod statistics;
pub mod tracker;
pub mod view;
