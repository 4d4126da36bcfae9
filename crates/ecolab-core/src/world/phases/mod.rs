mod actions;
mod cull;
mod environment;
