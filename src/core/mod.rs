pub mod command;

pub use command::{command_for_chord, Chord, Command};
