mod builder;
mod handle;
mod state;


pub use builder::CountdownsBuilder;
pub use handle::Countdowns;
